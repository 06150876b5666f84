//! Star Siege terminal frontend
//!
//! Owns everything the sim treats as a collaborator: key polling, cell
//! rendering, audio cue dispatch, modal screens and high-score persistence.
//! The sim itself only ever sees decoded `TickInput` intents.

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};

use star_siege::audio::{cue_for_event, AudioSink, LoggingAudio};
use star_siege::consts::SIM_DT;
use star_siege::platform::Presenter;
use star_siege::sim::{
    tick, AlienState, AlienTier, GameEvent, GamePhase, GameState, ShipState, TickInput,
};
use star_siege::{HighScores, Settings};

/// One frame per simulation tick (60 Hz)
const FRAME: Duration = Duration::from_millis(16);

/// A key counts as "held" if its last press/repeat arrived within this many
/// frames. Covers terminals without key-release events: OS key-repeat
/// refreshes the window before it expires.
const HOLD_WINDOW: u64 = 4;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".star_siege_scores.json")
}

/// Blocking modal banners drawn straight to the terminal
struct TerminalPresenter;

impl TerminalPresenter {
    fn banner(&self, lines: &[String], hold: Duration) {
        let mut out = stdout();
        if let Ok((width, height)) = terminal::size() {
            let cy = height / 2;
            for (i, line) in lines.iter().enumerate() {
                let cx = (width / 2).saturating_sub(line.chars().count() as u16 / 2);
                let _ = out.queue(cursor::MoveTo(cx, cy.saturating_sub(1) + i as u16));
                let _ = out.queue(style::SetForegroundColor(Color::Yellow));
                let _ = out.queue(Print(line));
            }
            let _ = out.queue(style::ResetColor);
            let _ = out.flush();
        }
        thread::sleep(hold);
    }
}

impl Presenter for TerminalPresenter {
    fn level_intro(&mut self, level: u32) {
        self.banner(&[format!("-  LEVEL {level}  -")], Duration::from_millis(1200));
    }

    fn game_over(&mut self, score: u32, high_score: u32) {
        self.banner(
            &[
                "GAME OVER".to_string(),
                format!("score {score}   best {high_score}"),
            ],
            Duration::from_millis(1800),
        );
    }
}

enum MenuResult {
    Play,
    Scores,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    scores: &HighScores,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "*  STAR  SIEGE  *";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if !scores.is_empty() {
        let best = format!("Best Score: {}", scores.top_score());
        out.queue(cursor::MoveTo(
            cx.saturating_sub(best.chars().count() as u16 / 2),
            cy.saturating_sub(3),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&best))?;
    }

    let lines = [
        "[ENTER] Enter Battle",
        "[H]     High Scores",
        "[Q]     Quit",
        "",
        "Arrows / A D : Move    SPACE : Fire",
    ];
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + i as u16))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(line))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Enter => return Ok(MenuResult::Play),
                KeyCode::Char('h') | KeyCode::Char('H') => return Ok(MenuResult::Scores),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit)
                }
                _ => {}
            }
        }
    }
}

fn show_high_scores<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    scores: &HighScores,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let top = (height / 2)
        .saturating_sub((scores.entries.len() as u16 / 2).min(8))
        .saturating_sub(2);

    out.queue(cursor::MoveTo(cx.saturating_sub(6), top))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print("HIGH SCORES"))?;

    if scores.is_empty() {
        out.queue(cursor::MoveTo(cx.saturating_sub(8), top + 2))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print("nothing here yet"))?;
    }
    for (i, entry) in scores.entries.iter().enumerate() {
        let line = format!("{:>2}. {:>7}  level {}", i + 1, entry.score, entry.level);
        out.queue(cursor::MoveTo(cx.saturating_sub(10), top + 2 + i as u16))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(&line))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(10), top + 14))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("press any key to go back"))?;
    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        if let Ok(Event::Key(KeyEvent { kind, .. })) = rx.recv() {
            if kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

fn render<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let sx = width as f32 / state.settings.screen_width;
    // Keep the last row for the HUD
    let sy = (height.saturating_sub(1)) as f32 / state.settings.screen_height;
    let cell = |x: f32, y: f32| -> (u16, u16) {
        (
            (x * sx).clamp(0.0, (width as f32 - 1.0).max(0.0)) as u16,
            (y * sy).clamp(0.0, (height as f32 - 2.0).max(0.0)) as u16,
        )
    };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    for star in &state.stars {
        let (x, y) = cell(star.pos.x, star.pos.y);
        out.queue(cursor::MoveTo(x, y))?;
        out.queue(Print("."))?;
    }

    for alien in &state.aliens {
        let center = alien.rect().center();
        let (x, y) = cell(center.x, center.y);
        out.queue(cursor::MoveTo(x, y))?;
        match alien.state {
            AlienState::Dying { .. } => {
                out.queue(style::SetForegroundColor(Color::Red))?;
                out.queue(Print("*"))?;
            }
            AlienState::Alive => {
                let (color, glyph) = match alien.tier {
                    AlienTier::Tier1 => (Color::Magenta, "@"),
                    AlienTier::Tier2 => (Color::Green, "&"),
                    AlienTier::Tier3 => (Color::Cyan, "#"),
                };
                out.queue(style::SetForegroundColor(color))?;
                out.queue(Print(glyph))?;
            }
        }
    }

    if let Some(ufo) = &state.ufo {
        let center = ufo.rect().center();
        let (x, y) = cell(center.x, center.y);
        out.queue(cursor::MoveTo(x.saturating_sub(1), y))?;
        if ufo.is_alive() {
            out.queue(style::SetForegroundColor(Color::Red))?;
            out.queue(Print("<O>"))?;
        } else {
            out.queue(style::SetForegroundColor(Color::Yellow))?;
            out.queue(Print("*+*"))?;
        }
    }

    for block in &state.bunkers {
        let center = block.rect.center();
        let (x, y) = cell(center.x, center.y);
        out.queue(cursor::MoveTo(x, y))?;
        out.queue(style::SetForegroundColor(Color::Green))?;
        let glyph = match block.hp {
            3.. => "█",
            2 => "▓",
            _ => "░",
        };
        out.queue(Print(glyph))?;
    }

    out.queue(style::SetForegroundColor(Color::Yellow))?;
    for bullet in &state.bullets {
        let (x, y) = cell(bullet.x, bullet.y);
        out.queue(cursor::MoveTo(x, y))?;
        out.queue(Print("|"))?;
    }
    out.queue(style::SetForegroundColor(Color::Red))?;
    for beam in &state.beams {
        let (x, y) = cell(beam.x, beam.y);
        out.queue(cursor::MoveTo(x, y))?;
        out.queue(Print("!"))?;
    }

    let (x, y) = cell(state.ship.x, state.ship.y);
    out.queue(cursor::MoveTo(x, y))?;
    match state.ship.state {
        ShipState::Alive => {
            out.queue(style::SetForegroundColor(Color::White))?;
            out.queue(Print("^"))?;
        }
        ShipState::Dying { ticks_left } => {
            out.queue(style::SetForegroundColor(Color::Red))?;
            out.queue(Print(if ticks_left % 10 < 5 { "*" } else { "+" }))?;
        }
    }

    let hud = format!(
        " score {:>6}   best {:>6}   level {}   ships {}   aliens {}",
        state.stats.score,
        state.stats.high_score,
        state.stats.level,
        state.stats.ships_left,
        state.stats.aliens_left,
    );
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&hud))?;

    out.queue(style::ResetColor)?;
    out.flush()
}

/// Returns true when the player asked to quit the program
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    scores: &mut HighScores,
    audio: &mut impl AudioSink,
    presenter: &mut impl Presenter,
) -> std::io::Result<bool> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    audio.music_start();
    state.start_game();

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut fire = false;

        while let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            // Clean shutdown: the high score must survive
                            scores.add_score(state.stats.score, state.stats.level);
                            scores.save_to(&high_score_path());
                            audio.music_stop();
                            return Ok(true);
                        }
                        KeyCode::Char(' ') => fire = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let input = TickInput {
            left: is_held(&key_frame, &KeyCode::Left, frame)
                || is_held(&key_frame, &KeyCode::Char('a'), frame),
            right: is_held(&key_frame, &KeyCode::Right, frame)
                || is_held(&key_frame, &KeyCode::Char('d'), frame),
            fire,
        };

        tick(state, &input, SIM_DT);
        render(out, state)?;

        for event in state.drain_events() {
            if let Some(cue) = cue_for_event(&event) {
                audio.play(cue);
            }
            match event {
                GameEvent::LevelCleared { level } => presenter.level_intro(level),
                GameEvent::GameOver { score } => {
                    audio.music_stop();
                    scores.add_score(score, state.stats.level);
                    scores.save_to(&high_score_path());
                    presenter.game_over(score, state.stats.high_score);
                    return Ok(false);
                }
                _ => {}
            }
        }
        debug_assert!(state.phase != GamePhase::GameOver || !state.stats.game_active);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut scores = HighScores::load_from(&high_score_path());
    let mut audio = LoggingAudio;
    let mut presenter = TerminalPresenter;

    loop {
        match show_menu(out, rx, &scores)? {
            MenuResult::Quit => break,
            MenuResult::Scores => show_high_scores(out, rx, &scores)?,
            MenuResult::Play => {
                let seed = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(0);
                let mut state = GameState::new(seed, Settings::default(), scores.top_score());
                let quit = game_loop(out, &mut state, rx, &mut scores, &mut audio, &mut presenter)?;
                if quit {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    log::info!("star-siege starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Blocking event reads on a dedicated thread so the game loop never
    // waits on input I/O
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
