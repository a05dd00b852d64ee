// The operator console: one command per line.

use chrono::{NaiveDate, Utc};
use std::io::{BufRead, Write};

use crate::kiosk::display::*;
use crate::kiosk::io_csv::*;
use crate::kiosk::*;

const HELP: &str = "Commands:
  login <identifier> <secret>   authenticate a voter
  vote <candidate id>           vote for a candidate
  void                          cast a void ballot
  end | reopen                  end or re-open the voting
  reset                         erase all the data (asks for confirmation)
  export                        export the tally as CSV
  results | status | help | quit";

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Command {
    Login { identifier: String, secret: String },
    Vote(String),
    Void,
    End,
    Reopen,
    Reset,
    Export,
    Results,
    Status,
    Help,
    Quit,
}

/// Keeps the digits of a National Identification Number, at most 10 of them.
pub fn sanitize_identifier(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).take(10).collect()
}

/// Parses one line. Blank lines give `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let name = match words.next() {
        Some(w) => w.to_lowercase(),
        None => return Ok(None),
    };
    let rest: Vec<&str> = words.collect();
    let cmd = match (name.as_str(), rest.as_slice()) {
        ("login", args) => Command::Login {
            identifier: args.first().map(|s| sanitize_identifier(s)).unwrap_or_default(),
            secret: args.get(1..).map(|s| s.join(" ")).unwrap_or_default(),
        },
        ("vote", [id]) => Command::Vote(id.to_string()),
        ("vote", _) => return Err("usage: vote <candidate id>".to_string()),
        ("void", []) => Command::Void,
        ("end", []) => Command::End,
        ("reopen", []) => Command::Reopen,
        ("reset", []) => Command::Reset,
        ("export", []) => Command::Export,
        ("results", []) => Command::Results,
        ("status", []) => Command::Status,
        ("help", _) => Command::Help,
        ("quit", []) | ("exit", []) => Command::Quit,
        _ => return Err(format!("Unknown command: {}", line.trim())),
    };
    Ok(Some(cmd))
}

pub struct Console<P: Persistence> {
    kiosk: Kiosk<P>,
    out_dir: PathBuf,
    reference: Option<String>,
}

impl<P: Persistence> Console<P> {
    pub fn new(kiosk: Kiosk<P>, out_dir: PathBuf, reference: Option<String>) -> Console<P> {
        Console {
            kiosk,
            out_dir,
            reference,
        }
    }

    /// Reads commands until the input is exhausted or `quit` is entered.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> KResult<()> {
        writeln!(out, "Electronic Voting Portal").context(ConsoleIoSnafu {})?;
        writeln!(out, "{}", HELP).context(ConsoleIoSnafu {})?;
        let mut lines = input.lines();
        loop {
            write!(out, "> ").context(ConsoleIoSnafu {})?;
            out.flush().context(ConsoleIoSnafu {})?;
            let line = match lines.next() {
                Some(l) => l.context(ConsoleIoSnafu {})?,
                None => break,
            };
            let keep_going = self.handle_line(&line, Utc::now().date_naive(), out)?;
            if !keep_going {
                break;
            }
        }
        info!("Console closed");
        Ok(())
    }

    /// Handles one line of input. Returns false when the console should stop.
    pub fn handle_line<W: Write>(
        &mut self,
        line: &str,
        today: NaiveDate,
        out: &mut W,
    ) -> KResult<bool> {
        // A pending reset takes the next line as its answer.
        if self.kiosk.reset_requested() {
            let answer = line.trim().to_lowercase();
            if answer == "yes" || answer == "y" {
                if let Err(e) = self.kiosk.confirm_reset() {
                    warn!("reset: {}", e);
                }
                writeln!(out, "All the election data has been erased.").context(ConsoleIoSnafu {})?;
            } else {
                self.kiosk.cancel_reset();
                writeln!(out, "Reset cancelled.").context(ConsoleIoSnafu {})?;
            }
            return Ok(true);
        }

        let cmd = match parse_command(line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => return Ok(true),
            Err(msg) => {
                writeln!(out, "{}", msg).context(ConsoleIoSnafu {})?;
                return Ok(true);
            }
        };
        debug!("command: {:?}", cmd);
        self.execute(cmd, today, out)
    }

    fn execute<W: Write>(&mut self, cmd: Command, today: NaiveDate, out: &mut W) -> KResult<bool> {
        let msg: String = match cmd {
            Command::Login { identifier, secret } => {
                let res = self
                    .kiosk
                    .submit_credential(&identifier, &secret)
                    .map(render_credential);
                match res {
                    Ok(banner) => format!("{}\n{}", banner, render_ballot(self.kiosk.candidates())),
                    Err(e) => e.to_string(),
                }
            }
            Command::Vote(id) => match self.kiosk.cast_vote(&id) {
                Ok(()) => format!(
                    "Your vote has been recorded.\n{}",
                    render_results(self.kiosk.candidates(), self.kiosk.store())
                ),
                Err(e) => {
                    // Refused ballots are not reported to the operator.
                    info!("vote ignored: {}", e);
                    return Ok(true);
                }
            },
            Command::Void => match self.kiosk.cast_void() {
                Ok(()) => format!(
                    "Void ballot recorded.\n{}",
                    render_results(self.kiosk.candidates(), self.kiosk.store())
                ),
                Err(e) => {
                    info!("void ballot ignored: {}", e);
                    return Ok(true);
                }
            },
            Command::End => {
                self.kiosk.end_voting();
                format!(
                    "Voting has ended.\n{}",
                    render_results(self.kiosk.candidates(), self.kiosk.store())
                )
            }
            Command::Reopen => {
                self.kiosk.reopen_voting();
                "Voting is open.".to_string()
            }
            Command::Reset => {
                self.kiosk.request_reset();
                "This will erase all data. Continue? [yes/no]".to_string()
            }
            Command::Export => self.export(today)?,
            Command::Results => {
                if self.kiosk.results_visible() {
                    render_results(self.kiosk.candidates(), self.kiosk.store())
                } else {
                    "No results yet.".to_string()
                }
            }
            Command::Status => render_status(&self.kiosk),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(false),
        };
        writeln!(out, "{}", msg).context(ConsoleIoSnafu {})?;
        Ok(true)
    }

    fn export(&self, today: NaiveDate) -> KResult<String> {
        let content = export_csv(self.kiosk.candidates(), self.kiosk.store());
        let path = write_export(&self.out_dir, today, &content)?;
        let mut msg = format!("Exported {}", path.display());
        if let Some(reference) = &self.reference {
            if check_reference(reference, &content)? {
                msg.push_str("\nThe export matches the reference.");
            } else {
                msg.push_str("\nThe export differs from the reference.");
            }
        }
        Ok(msg)
    }
}
