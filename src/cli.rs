//! Interactive REPL for driving the sticks from a terminal
//!
//! Stands in for the on-screen joystick widget: `left`/`right` feed move
//! events, `stop` releases a stick, `status` shows the link and both vectors.

use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;

use crate::input::{AxisVector, ControlChannel};
use crate::link::ConnectionState;
use crate::session::TeleopSession;

pub async fn run_repl(session: &TeleopSession) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    print_help();

    loop {
        let readline = rl.readline("teleop> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                if line == "exit" || line == "quit" {
                    break;
                }

                if let Err(e) = dispatch(session, line).await {
                    println!("{} {e}", "error:".red());
                }
            },
            Err(_) => break,
        }
    }

    Ok(())
}

async fn dispatch(session: &TeleopSession, line: &str) -> Result<()> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    match parts.as_slice() {
        ["help"] => print_help(),
        ["status"] => print_status(session),
        ["stop", channel] => {
            session.on_stop(parse_channel(channel)?).await;
        },
        [channel @ ("left" | "right"), x, y] => {
            let vector = AxisVector::new(parse_axis(x)?, parse_axis(y)?);
            session.on_move(parse_channel(channel)?, vector).await;
        },
        _ => anyhow::bail!("unknown command: {line} (try 'help')"),
    }

    Ok(())
}

fn parse_channel(raw: &str) -> Result<ControlChannel> {
    match raw {
        "left" | "l" => Ok(ControlChannel::Left),
        "right" | "r" => Ok(ControlChannel::Right),
        other => anyhow::bail!("unknown channel: {other} (expected left or right)"),
    }
}

fn parse_axis(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("not a number: {raw}"))?;
    if !(-1.0..=1.0).contains(&value) {
        anyhow::bail!("axis value {value} out of range [-1, 1]");
    }
    Ok(value)
}

fn print_status(session: &TeleopSession) {
    let state = match session.connection_state() {
        ConnectionState::Connected => "connected".green(),
        ConnectionState::Connecting => "connecting".yellow(),
        ConnectionState::Disconnected => "disconnected".red(),
    };
    let left = session.vector(ControlChannel::Left);
    let right = session.vector(ControlChannel::Right);

    println!("  link:  {state}");
    println!("  left:  ({}, {})", left.x, left.y);
    println!("  right: ({}, {})", right.x, right.y);
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  left <x> <y>    move the left stick  (values in [-1, 1])");
    println!("  right <x> <y>   move the right stick");
    println!("  stop <left|right>  release a stick");
    println!("  status          show link state and stick vectors");
    println!("  exit            quit");
}
