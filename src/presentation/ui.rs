use crate::application::{App, AppMode, BankDetailsProps, ContactDetailsProps};
use crate::domain::{find_country_code, format_phone_number, Field, Step, BANKS, COUNTRY_CODES};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

const FIELD_HEIGHT: u16 = 4;
const DROPDOWN_WIDTH: u16 = 40;

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match app.form.step() {
        Some(Step::One) => render_bank_details(f, app, &app.form.bank_details_props(), chunks[1]),
        Some(Step::Two) => render_contact_details(f, app, &app.form.contact_details_props(), chunks[1]),
        None => render_confirmation(f, app, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);

    match app.mode {
        AppMode::BankDropdown => {
            let items: Vec<String> = BANKS.iter().map(|b| b.to_string()).collect();
            render_dropdown(f, "Select an option", &items, app.dropdown_index);
        }
        AppMode::CountryDropdown => {
            let items: Vec<String> = COUNTRY_CODES
                .iter()
                .map(|c| format!("{:<5} {}", c.code, c.country))
                .collect();
            render_dropdown(f, "Country code", &items, app.dropdown_index);
        }
        AppMode::Help => render_help_popup(f),
        AppMode::Form => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let progress = match app.form.step() {
        Some(step) => format!("Step {} of 2", step.number()),
        None => "Done".to_string(),
    };
    let header = Paragraph::new(format!("← Recipient details | {progress}"))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(header, area);
}

fn field_areas(area: Rect, count: usize) -> Vec<Rect> {
    let mut constraints = vec![Constraint::Length(FIELD_HEIGHT); count];
    constraints.push(Constraint::Min(0));
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

/// One labelled input: a bordered box holding the value and an error line under it.
fn render_field(f: &mut Frame, area: Rect, label: &str, value: Line, error: Option<&str>, focused: bool) {
    let border_style = if error.is_some() {
        Style::default().fg(Color::Red)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let input = Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label.to_string())
            .border_style(border_style),
    );
    f.render_widget(input, parts[0]);

    if let Some(message) = error {
        let error_line = Paragraph::new(format!("  {message}")).style(Style::default().fg(Color::Red));
        f.render_widget(error_line, parts[1]);
    }
}

fn value_or_placeholder(value: &str, placeholder: &str, focused: bool) -> Line<'static> {
    if value.is_empty() {
        Line::from(Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray)))
    } else if focused {
        Line::from(vec![Span::raw(value.to_string()), Span::styled("▏", Style::default().fg(Color::Cyan))])
    } else {
        Line::from(value.to_string())
    }
}

fn render_bank_details(f: &mut Frame, app: &App, props: &BankDetailsProps, area: Rect) {
    let areas = field_areas(area, 3);

    let bank = if props.bank.is_empty() {
        Line::from(Span::styled("Select an option ▾", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(format!("{} ▾", props.bank))
    };
    render_field(f, areas[0], Field::Bank.label(), bank, props.errors.get(Field::Bank), app.focus == Field::Bank);

    let focused = app.focus == Field::AccountNumber;
    render_field(
        f,
        areas[1],
        Field::AccountNumber.label(),
        value_or_placeholder(&props.account_number, "Enter your account number", focused),
        props.errors.get(Field::AccountNumber),
        focused,
    );

    let name = if props.is_loading {
        Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(
            props.account_name.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
    };
    render_field(f, areas[2], Field::AccountName.label(), name, props.errors.get(Field::AccountName), false);
}

fn render_contact_details(f: &mut Frame, app: &App, props: &ContactDetailsProps, area: Rect) {
    let areas = field_areas(area, 3);

    let focused = app.focus == Field::Email;
    render_field(
        f,
        areas[0],
        Field::Email.label(),
        value_or_placeholder(&props.email, "Enter recipient email", focused),
        props.errors.get(Field::Email),
        focused,
    );

    let country = find_country_code(&props.country_code)
        .map(|c| format!("{} {} ▾", c.code, c.country))
        .unwrap_or_else(|| props.country_code.clone());
    render_field(
        f,
        areas[1],
        Field::CountryCode.label(),
        Line::from(country),
        None,
        app.focus == Field::CountryCode,
    );

    let focused = app.focus == Field::PhoneNumber;
    render_field(
        f,
        areas[2],
        Field::PhoneNumber.label(),
        value_or_placeholder(&format_phone_number(&props.phone_number), "000 - 000 - 00000", focused),
        props.errors.get(Field::PhoneNumber),
        focused,
    );
}

fn render_confirmation(f: &mut Frame, app: &App, area: Rect) {
    let data = app.form.data();
    let lines = vec![
        Line::from(Span::styled(
            "Form submitted successfully",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Bank:           {}", data.bank)),
        Line::from(format!("Account number: {}", data.account_number)),
        Line::from(format!("Account name:   {}", data.account_name)),
        Line::from(format!("Email:          {}", data.email)),
        Line::from(format!(
            "Phone:          {} {}",
            data.country_code,
            format_phone_number(&data.phone_number)
        )),
    ];
    let summary = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Recipient"));
    f.render_widget(summary, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(ref status) = app.status_message {
        status.clone()
    } else {
        match (app.mode, app.form.step()) {
            (AppMode::BankDropdown | AppMode::CountryDropdown, _) => {
                "↑↓: choose | Enter: select | Esc: close".to_string()
            }
            (AppMode::Help, _) => "Esc/F1: close help".to_string(),
            (AppMode::Form, None) => "Enter: new recipient | q: quit".to_string(),
            (AppMode::Form, Some(_)) if app.form.is_loading() => "Looking up account name...".to_string(),
            (AppMode::Form, Some(Step::One)) => "Tab: next field | Enter: Next | F1: help | Ctrl+C: quit".to_string(),
            (AppMode::Form, Some(Step::Two)) => {
                "Tab: next field | Enter: Next | Esc: Back | F1: help | Ctrl+C: quit".to_string()
            }
        }
    };

    let status_style = if app.form.errors().is_empty() {
        Style::default()
    } else {
        Style::default().fg(Color::Yellow)
    };
    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style);
    f.render_widget(status, area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Where an open list of `item_count` options sits on `screen`, border included.
pub fn dropdown_area(screen: Rect, item_count: usize) -> Rect {
    let height = u16::try_from(item_count).unwrap_or(u16::MAX).saturating_add(2);
    centered_rect(screen, DROPDOWN_WIDTH, height)
}

fn render_dropdown(f: &mut Frame, title: &str, items: &[String], selected: usize) {
    let popup_area = dropdown_area(f.area(), items.len());
    f.render_widget(Clear, popup_area);

    let list = List::new(items.iter().map(|item| ListItem::new(item.clone())).collect::<Vec<_>>())
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected));
    f.render_stateful_widget(list, popup_area, &mut state);
}

fn render_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_widget = Paragraph::new(get_help_text())
        .block(Block::default()
            .borders(Borders::ALL)
            .title("Recipient details help")
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"STEP 1: BANK DETAILS
Bank            Enter or Space opens the list of supported banks
Account number  Digits only, exactly 10; the account name is looked up
                automatically once all 10 digits are in

STEP 2: CONTACT DETAILS
Recipient email Must look like name@domain.tld
Country code    Enter or Space opens the list of dialling codes
Phone number    At least 10 digits

KEYS
Tab / ↓         Next field
Shift+Tab / ↑   Previous field
Enter           Next step (or open the focused list)
Esc             Close list, or go back from step 2
Backspace       Delete last character
Ctrl+U          Clear the focused field
Ctrl+N / Ctrl+B Next / Back
F1              Toggle this help
Ctrl+C          Quit"#
}
