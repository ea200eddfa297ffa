//! A line-oriented session that loads once and re-renders on every query change.

use crate::args::ViewArgs;
use crate::commands::view::{apply_args, Part, Report};
use crate::commands::{Out, OutputFormat};
use crate::state::{AmountScope, AppState, Event};
use crate::{Config, Result};
use anyhow::{bail, Context};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

const PROMPT: &str = "ledger> ";

const HELP: &str = "\
Commands:
  name <text>       show customers whose name contains <text>, empty to clear
  amount <number>   set the minimum transaction amount, empty to clear
  scope <scope>     'ignored' or 'display': whether the amount hides rows
  clear             clear the name and amount
  show              render again
  help              show this message
  quit              leave
";

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
enum Input {
    Events(Vec<Event>),
    Show,
    Help,
    Quit,
    Blank,
}

impl Input {
    /// Everything after the first space is the argument, kept as typed.
    fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(Input::Blank);
        }
        let line = line.trim_start();
        let (word, arg) = line.split_once(' ').unwrap_or((line, ""));
        let input = match word {
            "name" | "n" => Input::Events(vec![Event::NameQueryChanged(arg.to_string())]),
            "amount" | "a" => Input::Events(vec![Event::AmountQueryChanged(arg.to_string())]),
            "scope" => {
                let scope: AmountScope = arg
                    .trim()
                    .parse()
                    .with_context(|| format!("Unknown scope '{}'", arg.trim()))?;
                Input::Events(vec![Event::AmountScopeChanged(scope)])
            }
            "clear" => Input::Events(vec![
                Event::NameQueryChanged(String::new()),
                Event::AmountQueryChanged(String::new()),
            ]),
            "show" => Input::Show,
            "help" | "?" => Input::Help,
            "quit" | "exit" | "q" => Input::Quit,
            other => bail!("Unknown command '{other}', type 'help' for the list of commands"),
        };
        Ok(input)
    }
}

/// Loads once, renders, then reads commands from `input` until `quit` or end of input. Every
/// command that changes a query re-renders the view to `output`. A failed load is shown as an
/// error line above empty results and the session continues.
pub async fn interactive<R, W>(
    config: Config,
    args: ViewArgs,
    input: R,
    mut output: W,
) -> Result<Out<()>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let source = config.source()?;
    let format = args.format();
    let mut state = apply_args(config.initial_state().load(source.as_ref()).await, &args);
    write_view(&mut output, &state, format).await?;

    let mut lines = input.lines();
    let mut changes = 0_usize;
    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match Input::parse(&line) {
            Ok(Input::Events(events)) => {
                state = events.into_iter().fold(state, AppState::apply);
                changes += 1;
                write_view(&mut output, &state, format).await?;
            }
            Ok(Input::Show) => write_view(&mut output, &state, format).await?,
            Ok(Input::Help) => output.write_all(HELP.as_bytes()).await?,
            Ok(Input::Quit) => break,
            Ok(Input::Blank) => {}
            Err(e) => {
                debug!("Bad input {line:?}: {e:#}");
                output.write_all(format!("{e:#}\n").as_bytes()).await?;
            }
        }
    }
    output.flush().await?;
    Ok(format!("Interactive session ended after {changes} changes").into())
}

async fn write_view<W>(output: &mut W, state: &AppState, format: OutputFormat) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let report = Report::new(state, Part::All, format)?;
    output.write_all(report.rendered().as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::payload_json;
    use tempfile::TempDir;

    fn config_with_file(dir: &TempDir) -> Config {
        let path = dir.path().join("customers.json");
        std::fs::write(&path, payload_json().to_string()).unwrap();
        Config::default().with_endpoint(path.to_str())
    }

    async fn run(config: Config, script: &str) -> (Out<()>, Vec<String>) {
        let mut output = Vec::new();
        let out = interactive(config, ViewArgs::default(), script.as_bytes(), &mut output)
            .await
            .unwrap();
        let text = String::from_utf8(output).unwrap();
        let segments = text.split(PROMPT).map(str::to_string).collect();
        (out, segments)
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(
            Input::parse("name Aya El").unwrap(),
            Input::Events(vec![Event::NameQueryChanged("Aya El".to_string())])
        );
        assert_eq!(
            Input::parse("amount\r").unwrap(),
            Input::Events(vec![Event::AmountQueryChanged(String::new())])
        );
        assert_eq!(
            Input::parse("scope display").unwrap(),
            Input::Events(vec![Event::AmountScopeChanged(AmountScope::Display)])
        );
        assert_eq!(Input::parse("   ").unwrap(), Input::Blank);
        assert_eq!(Input::parse("q").unwrap(), Input::Quit);
        assert!(Input::parse("scope everything").is_err());
        assert!(Input::parse("delete 1").is_err());
    }

    #[tokio::test]
    async fn test_session_rerenders_on_change() {
        let dir = TempDir::new().unwrap();
        let script = "name ya\namount 1000\nscope display\nhelp\nbogus\nquit\nname never\n";
        let (out, segments) = run(config_with_file(&dir), script).await;

        assert_eq!(segments.len(), 7);
        assert!(segments[0].contains("Ahmed Ali"));

        assert!(segments[1].contains("Aya Elsayed"));
        assert!(!segments[1].contains("Ahmed Ali"));

        // The amount alone does not hide rows until the scope is "display".
        assert!(segments[2].contains("| 550"));
        assert!(segments[3].contains("| 1300"));
        assert!(!segments[3].contains("| 550"));

        assert!(segments[4].starts_with("Commands:"));
        assert!(segments[5].contains("Unknown command 'bogus'"));
        assert!(segments[6].is_empty());
        assert!(out.message().contains("3 changes"));
    }

    #[tokio::test]
    async fn test_session_ends_at_end_of_input() {
        let dir = TempDir::new().unwrap();
        let (_, segments) = run(config_with_file(&dir), "clear\n").await;
        assert_eq!(segments.len(), 3);
        assert!(segments[1].contains("Sarah Reda"));
    }

    #[tokio::test]
    async fn test_session_with_failed_load() {
        let dir = TempDir::new().unwrap();
        let config = Config::default().with_endpoint(dir.path().join("absent.json").to_str());
        let (_, segments) = run(config, "name a\n").await;
        assert!(segments[0].starts_with("Error: "));
        assert!(segments[1].starts_with("Error: "));
        assert!(segments[1].contains("(no data)"));
    }
}
