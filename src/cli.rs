use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "drawscreen",
    version,
    about = "Replay recorded pen input through the capture pipeline"
)]
pub struct Cli {
    /// Settings file (JSON); defaults are used when omitted
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Feed a JSON array of pointer events through a capture session
    Replay {
        /// Recorded pointer events
        events: PathBuf,

        /// Where to write the submission PNG
        #[arg(short, long)]
        out: PathBuf,

        /// Also write the pressure color map PNG
        #[arg(long)]
        color_map: Option<PathBuf>,

        /// Write the motion log as JSON
        #[arg(long)]
        log: Option<PathBuf>,

        /// Send the drawing to the scoring endpoint
        #[arg(long)]
        submit: bool,
    },

    /// Print the effective settings as JSON
    Settings,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_replay_flags() {
        let cli = Cli::try_parse_from([
            "drawscreen",
            "replay",
            "events.json",
            "--out",
            "drawing.png",
            "--color-map",
            "map.png",
            "--submit",
        ])
        .unwrap();

        match cli.command {
            Commands::Replay {
                events,
                out,
                color_map,
                log,
                submit,
            } => {
                assert_eq!(events, PathBuf::from("events.json"));
                assert_eq!(out, PathBuf::from("drawing.png"));
                assert_eq!(color_map, Some(PathBuf::from("map.png")));
                assert!(log.is_none());
                assert!(submit);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_replay_requires_output() {
        assert!(Cli::try_parse_from(["drawscreen", "replay", "events.json"]).is_err());
    }
}
