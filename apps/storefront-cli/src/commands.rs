use anyhow::{anyhow, bail, Result};

use storefront_core::facets::FacetGroup;
use storefront_engine::Key;

pub const HELP: &str = "\
Commands:
  <text>                      search for <text>
  ?<text>                     type <text> and show suggestions
  /down, /up                  move the suggestion highlight
  /enter                      submit (the highlighted suggestion, if any)
  /esc                        hide suggestions
  /pick <n>                   choose suggestion n
  /facets                     show filters
  /toggle <category|type|brand> <value>
  /clear                      clear all filters
  /hybrid                     toggle hybrid search
  /open <n|id>                open product details
  /close                      close product details
  /theme                      toggle light/dark
  /help, /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Redraw,
    Submit(String),
    Type(String),
    Key(Key),
    /// 1-based suggestion number.
    Pick(usize),
    Facets,
    Toggle { group: FacetGroup, value: String },
    Clear,
    Hybrid,
    Open(String),
    Close,
    Theme,
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<Command> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(Command::Redraw);
    }
    if let Some(text) = line.strip_prefix('?') {
        return Ok(Command::Type(text.to_string()));
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Submit(line.to_string()));
    };

    let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let args = args.trim();
    let command = match name {
        "down" => Command::Key(Key::ArrowDown),
        "up" => Command::Key(Key::ArrowUp),
        "enter" => Command::Key(Key::Enter),
        "esc" | "escape" => Command::Key(Key::Escape),
        "pick" => {
            let n: usize = args.parse().map_err(|_| anyhow!("usage: /pick <n>"))?;
            if n == 0 {
                bail!("suggestions are numbered from 1");
            }
            Command::Pick(n)
        }
        "facets" | "filters" => Command::Facets,
        "toggle" => {
            let (group, value) = args
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("usage: /toggle <category|type|brand> <value>"))?;
            Command::Toggle { group: group.parse()?, value: value.trim().to_string() }
        }
        "clear" => Command::Clear,
        "hybrid" => Command::Hybrid,
        "open" => {
            if args.is_empty() {
                bail!("usage: /open <n|id>");
            }
            Command::Open(args.to_string())
        }
        "close" => Command::Close,
        "theme" => Command::Theme,
        "help" | "h" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => bail!("unknown command '/{other}', try /help"),
    };
    Ok(command)
}
