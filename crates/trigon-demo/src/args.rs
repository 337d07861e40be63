//! Command line parsing.

use std::fmt;
use std::path::PathBuf;

use trigon_engine::paint::Color;

pub const USAGE: &str = "\
usage: trigon [options]

  --variant <buffered|builtin>  vertex data from two buffers, or baked into the shader (default: buffered)
  --title <text>                window title (default: trigon)
  --size <W>x<H>                window / snapshot size in pixels (default: 800x600)
  --clear <#rrggbb[aa]>         background color (default: #000000)
  --snapshot <file.png>         render once without a window and write a PNG
  -h, --help                    print this help

Logging follows RUST_LOG (default: info).";

/// Which driver to run.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Variant {
    #[default]
    Buffered,
    Builtin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub variant: Variant,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear: Color,
    pub snapshot: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            variant: Variant::Buffered,
            title: "trigon".to_string(),
            width: 800,
            height: 600,
            clear: Color::BLACK,
            snapshot: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Args),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    MissingValue(String),
    UnknownFlag(String),
    InvalidValue { flag: String, value: String, reason: String },
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgError::MissingValue(flag) => write!(f, "{flag} needs a value"),
            ArgError::UnknownFlag(flag) => write!(f, "unknown argument {flag:?}"),
            ArgError::InvalidValue { flag, value, reason } => {
                write!(f, "invalid value {value:?} for {flag}: {reason}")
            }
        }
    }
}

impl std::error::Error for ArgError {}

/// Parses everything after the program name.
pub fn parse<I>(args: I) -> Result<Command, ArgError>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| ArgError::MissingValue(flag.to_string()));

        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--variant" => {
                let v = value("--variant")?;
                out.variant = match v.as_str() {
                    "buffered" => Variant::Buffered,
                    "builtin" => Variant::Builtin,
                    _ => return Err(invalid("--variant", &v, "expected buffered or builtin")),
                };
            }
            "--title" => out.title = value("--title")?,
            "--size" => {
                let v = value("--size")?;
                let (w, h) = parse_size(&v).ok_or_else(|| invalid("--size", &v, "expected <W>x<H> with both > 0"))?;
                out.width = w;
                out.height = h;
            }
            "--clear" => {
                let v = value("--clear")?;
                out.clear = Color::from_hex(&v).map_err(|e| invalid("--clear", &v, &e.to_string()))?;
            }
            "--snapshot" => out.snapshot = Some(PathBuf::from(value("--snapshot")?)),
            other => return Err(ArgError::UnknownFlag(other.to_string())),
        }
    }

    Ok(Command::Run(out))
}

fn invalid(flag: &str, value: &str, reason: &str) -> ArgError {
    ArgError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once(['x', 'X'])?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}
