use std::fs;
use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, ExecutableCommand};
use lc3_assembler::image::ObjectImage;
use lc3_sim::memory::BufferingDisplaySink;
use lc3_sim::sink::{DiagnosticSink, StdIoSink};
use lc3_sim::Simulator;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Terminal;

#[derive(Parser)]
#[clap(version, author, about = "Terminal debugger for LC-3 object images")]
struct Opts {
    /// Object image (.obj) produced by lc3-assembler
    image: PathBuf,
    /// Run to completion without the TUI, printing display output to stdout
    #[clap(short, long)]
    batch: bool,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let file = fs::File::open(&opts.image)
        .with_context(|| format!("Failed to open image file: {}", opts.image.display()))?;
    let image = ObjectImage::read_from(file)
        .with_context(|| format!("Failed to read object image: {}", opts.image.display()))?;

    let mut words = vec![image.origin];
    words.extend(image.words);

    if opts.batch {
        run_batch(&words)
    } else {
        run_tui(&words)
    }
}

fn run_batch(words: &[u16]) -> Result<()> {
    let mut sim = Simulator::new(BufferingDisplaySink::default());
    sim.load_image(words, Default::default());
    sim.run();
    let output = String::from_utf8_lossy(&sim.display().bytes).into_owned();
    print!("{output}");

    let mut diagnostics = StdIoSink;
    diagnostics.diagnostic(&format!(
        "-- halted: R0={} PC=x{:04X}",
        sim.get_register(0).unwrap_or(0),
        sim.get_pc()
    ));
    Ok(())
}

fn run_tui(words: &[u16]) -> Result<()> {
    let mut sim = Simulator::new(BufferingDisplaySink::default());
    sim.load_image(words, Default::default());

    let mut stdout = std::io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut sim);

    disable_raw_mode()?;
    std::io::stdout().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    sim: &mut Simulator<BufferingDisplaySink>,
) -> Result<()> {
    let mut status = String::from("Ready. s=stepIn o=stepOver O=stepOut r=run q=quit");

    loop {
        terminal.draw(|frame| draw(frame, sim, &status))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('s') => {
                        sim.step_in();
                        status = "stepIn".into();
                    }
                    KeyCode::Char('o') => {
                        let reason = sim.step_over();
                        status = format!("stepOver: {:?}", reason);
                    }
                    KeyCode::Char('O') => {
                        let reason = sim.step_out();
                        status = format!("stepOut: {:?}", reason);
                    }
                    KeyCode::Char('r') => {
                        let reason = sim.run();
                        status = format!("run: {:?}", reason);
                    }
                    KeyCode::Char(c) if c.is_ascii() => {
                        sim.keyboard_interrupt(c as u8);
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut ratatui::Frame, sim: &Simulator<BufferingDisplaySink>, status: &str) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(frame.area());

    let registers: Vec<ListItem> = (0..8)
        .map(|r| {
            ListItem::new(format!(
                "R{r} = x{:04X}",
                sim.get_register(r).unwrap_or(0)
            ))
        })
        .chain([
            ListItem::new(format!("PC  = x{:04X}", sim.get_pc())),
            ListItem::new(format!("PSR = x{:04X}", sim.get_psr())),
        ])
        .collect();
    let reg_list = List::new(registers).block(Block::default().title("Registers").borders(Borders::ALL));
    frame.render_widget(reg_list, chunks[0]);

    let pc = sim.get_pc();
    let rows = sim.format_range(pc.saturating_sub(4), 16);
    let lines: Vec<Line> = rows
        .iter()
        .map(|row| {
            let marker = if row.addr == pc { "-> " } else { "   " };
            let style = if row.addr == pc {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Line::styled(
                format!("{marker}x{:04X}: {}", row.addr, row.hex_value),
                style,
            )
        })
        .collect();
    let mem_view = Paragraph::new(lines).block(
        Block::default()
            .title(format!("Memory - {status}"))
            .borders(Borders::ALL),
    );
    frame.render_widget(mem_view, chunks[1]);
}
