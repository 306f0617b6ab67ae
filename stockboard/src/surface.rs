//! Поверхность графика: строчный протокол событий указателя на stdin.
//!
//! Команды:
//!
//! - `hover <index> <x> <y> <left> <top>` — указатель над столбцом `index`,
//!   `left`/`top` — начало области построения
//! - `leave <x> <y>` — под указателем нет столбцов
//! - `render` — повторно вывести представление
//! - `quit` — завершить работу

use board_core::errors::BoardError;
use board_core::focus::HoverEvent;
use board_macros::LabelEnum;
use crossbeam_channel::Sender;
use log::{info, warn};
use std::io::{self, BufRead};
use std::str::FromStr;
use std::thread::{self, JoinHandle};

/// Команды поверхности графика.
#[derive(Debug, Clone, Copy, PartialEq, Eq, LabelEnum)]
enum SurfaceCommand {
    #[label("hover")]
    Hover,
    #[label("leave")]
    Leave,
    #[label("render")]
    Render,
    #[label("quit")]
    #[alias("exit")]
    Quit,
}

/// Событие поверхности графика для диспетчера.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// Наведение указателя.
    Hover(HoverEvent),
    /// Запрос повторной отрисовки.
    Render,
    /// Запрос завершения.
    Quit,
}

/// Разобрать строку протокола.
pub fn parse_line(line: &str) -> Result<SurfaceEvent, BoardError> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Err(BoardError::command_err("пустая строка"));
    };
    let args: Vec<&str> = parts.collect();

    match SurfaceCommand::from_str(cmd).map_err(|_| BoardError::command_err(cmd.to_string()))? {
        SurfaceCommand::Hover => {
            let [index, x, y, left, top] = args[..] else {
                return Err(BoardError::command_err(
                    "ожидается: hover <index> <x> <y> <left> <top>",
                ));
            };
            let index = index
                .parse::<usize>()
                .map_err(|_| BoardError::command_err(format!("некорректный индекс: {index}")))?;
            Ok(SurfaceEvent::Hover(HoverEvent::over(
                index,
                coordinate(x)?,
                coordinate(y)?,
                (coordinate(left)?, coordinate(top)?),
            )))
        }
        SurfaceCommand::Leave => {
            let (x, y) = match args[..] {
                [] => (0.0, 0.0),
                [x, y] => (coordinate(x)?, coordinate(y)?),
                _ => return Err(BoardError::command_err("ожидается: leave [<x> <y>]")),
            };
            Ok(SurfaceEvent::Hover(HoverEvent::leave(x, y)))
        }
        SurfaceCommand::Render => Ok(SurfaceEvent::Render),
        SurfaceCommand::Quit => Ok(SurfaceEvent::Quit),
    }
}

fn coordinate(s: &str) -> Result<f64, BoardError> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| BoardError::command_err(format!("некорректная координата: {s}")))
}

/// Запустить поток чтения stdin.
///
/// Поток только отправляет события и завершается при закрытии stdin или
/// канала. Некорректные строки записываются в лог и пропускаются.
pub fn spawn_stdin_surface(tx: Sender<SurfaceEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        info!("Поверхность графика (stdin) запущена");

        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                warn!("Ошибка чтения stdin");
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match parse_line(&line) {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(err) => warn!("Строка '{}' пропущена: {}", line.trim(), err),
            }
        }

        info!("Поверхность графика (stdin) остановлена");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hover() {
        let event = parse_line("hover 2 130 85 30 20").unwrap();
        assert_eq!(
            event,
            SurfaceEvent::Hover(HoverEvent::over(2, 130.0, 85.0, (30.0, 20.0)))
        );
    }

    #[test]
    fn parse_leave_with_and_without_position() {
        assert_eq!(
            parse_line("leave").unwrap(),
            SurfaceEvent::Hover(HoverEvent::leave(0.0, 0.0))
        );
        assert_eq!(
            parse_line("LEAVE 4 5").unwrap(),
            SurfaceEvent::Hover(HoverEvent::leave(4.0, 5.0))
        );
    }

    #[test]
    fn parse_control_commands() {
        assert_eq!(parse_line("render").unwrap(), SurfaceEvent::Render);
        assert_eq!(parse_line("quit").unwrap(), SurfaceEvent::Quit);
        assert_eq!(parse_line(" exit ").unwrap(), SurfaceEvent::Quit);
    }

    #[test]
    fn parse_rejects_bad_lines() {
        assert!(parse_line("").is_err());
        assert!(parse_line("click 1").is_err());
        assert!(parse_line("hover 1 2 3").is_err());
        assert!(parse_line("hover -1 0 0 0 0").is_err());
        assert!(parse_line("hover 1 x 0 0 0").is_err());
        assert!(parse_line("leave 1").is_err());
    }
}
