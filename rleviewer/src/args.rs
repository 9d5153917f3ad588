use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "rleviewer")]
#[command(about = "Pan/zoom viewer for large run-length-encoded images")]
#[command(version)]
pub struct Args {
    /// Encoded image file
    pub input: PathBuf,

    /// Configuration file path
    #[arg(short, long, env = "RLEVIEWER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Tile columns per row (skips geometry inference)
    #[arg(long, value_name = "N")]
    pub cols: Option<usize>,

    /// Initial scale in image pixels per device pixel
    #[arg(long, value_name = "SCALE")]
    pub scale: Option<f64>,

    /// Key script to replay, e.g. "right*4,zoom-out,down+right,exit"
    #[arg(long, value_name = "KEYS")]
    pub script: Option<String>,

    /// Write the final frame to this PNG file
    #[arg(long, value_name = "PNG")]
    pub snapshot: Option<PathBuf>,

    /// Render with the palette inverted
    #[arg(long)]
    pub invert: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let args = Args::try_parse_from([
            "rleviewer",
            "map.bin",
            "--cols",
            "4",
            "--scale",
            "2.5",
            "--script",
            "right*4,exit",
            "--snapshot",
            "out.png",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("map.bin"));
        assert_eq!(args.cols, Some(4));
        assert_eq!(args.scale, Some(2.5));
        assert_eq!(args.script.as_deref(), Some("right*4,exit"));
        assert_eq!(args.snapshot, Some(PathBuf::from("out.png")));
        assert!(args.verbose);
        assert!(!args.invert);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["rleviewer"]).is_err());
    }
}
