//! Recipient details form
//!
//! Collects a recipient's bank and contact details in two steps, validating
//! each step before moving on and looking up the account name as soon as a
//! full account number is entered.

use std::io;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};

use recipient_form::application::{App, FormController};
use recipient_form::config::{Cli, Settings};
use recipient_form::infrastructure::{init_logging, sink_for_path};
use recipient_form::presentation::{render_ui, InputHandler};

/// Entry point for the recipient details form.
///
/// Parses the command line, starts file logging, sets up the terminal and
/// runs the event loop until the user quits.
///
/// # Errors
///
/// Returns an error if logging or terminal setup fails, or if the terminal
/// fails while running.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from(Cli::parse());
    init_logging(settings.log_dir.as_deref(), settings.log_level)?;
    info!("starting with {settings:?}");

    let form = FormController::new(Box::new(settings.resolver()));
    let sink = sink_for_path(settings.submit_to.as_deref());
    let mut app = App::new(form, sink);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("terminal error: {err}");
        println!("{err:?}");
    }
    info!("exiting after {} submission(s)", app.submitted_count);

    Ok(())
}

/// Main event loop.
///
/// Waits for input no longer than the time left on a pending account lookup,
/// so the lookup completes on schedule even when the user is idle.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    InputHandler::handle_key_event(app, key.code, key.modifiers, Instant::now());
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let screen = Rect::new(0, 0, size.width, size.height);
                    InputHandler::handle_mouse_event(app, mouse, screen, Instant::now());
                }
                Event::Paste(text) => InputHandler::handle_paste(app, &text, Instant::now()),
                _ => {}
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}
