use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::error::Error;

/// Raw command-line options, mirrored one-to-one from the flags.
///
/// `-h` selects the output height, so the automatic short help flag is
/// disabled; help stays reachable through `--help`.
#[derive(Debug, Parser)]
#[command(
    name = "text-to-stereogram",
    version,
    about = "Render a random-dot autostereogram from a tile image and a text string or depth map",
    disable_help_flag = true
)]
pub struct Options {
    /// Output width in pixels.
    #[arg(short = 'w', value_name = "WIDTH", default_value_t = 640)]
    pub width: i32,

    /// Output height in pixels.
    #[arg(short = 'h', value_name = "HEIGHT", default_value_t = 480)]
    pub height: i32,

    /// Font size for text mode.
    #[arg(short = 's', value_name = "SIZE", default_value_t = 24)]
    pub font_size: i32,

    /// Font file used to rasterize the text.
    #[arg(short = 'f', value_name = "FONT")]
    pub font: Option<PathBuf>,

    /// Tile image providing the repeating pattern.
    #[arg(short = 't', value_name = "TILE")]
    pub tile: PathBuf,

    /// Write the finished stereogram to this PNG file.
    #[arg(short = 'o', value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Grayscale depth map image (instead of rendered text).
    #[arg(short = 'm', value_name = "DEPTH_MAP")]
    pub depth_map: Option<PathBuf>,

    /// Generate a cross-eyed stereogram instead of a wall-eyed one.
    #[arg(short = 'c')]
    pub cross_eyed: bool,

    /// Depth of the text above the far plane, 1 (far) to 255 (near).
    #[arg(short = 'd', value_name = "DEPTH", default_value_t = 60)]
    pub depth: i32,

    /// Pattern length divisor: at the near plane the pattern shrinks to the
    /// tile width divided by this.
    #[arg(short = 'l', value_name = "DIVISOR", default_value_t = 2.0)]
    pub pattern_divisor: f64,

    /// Text to render (text mode only).
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

/// Validated settings the pipeline runs from.
#[derive(Debug, Clone)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub tile_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub cross_eyed: bool,
    pub pattern_divisor: f64,
    pub depth: DepthSource,
}

/// Where the depth raster comes from.
#[derive(Debug, Clone)]
pub enum DepthSource {
    Text {
        font_path: PathBuf,
        size: u32,
        text: String,
        value: u8,
    },
    Map {
        path: PathBuf,
    },
}

impl Options {
    /// Check option ranges and mode exclusivity, producing the settings the
    /// pipeline consumes.
    pub fn validate(self) -> Result<Settings, Error> {
        if self.width <= 0 || self.height <= 0 {
            return Err(Error::Config("output dimensions must be positive".into()));
        }
        if self.font_size <= 0 {
            return Err(Error::Config("font size must be positive".into()));
        }
        if self.font.is_some() && !(1..=255).contains(&self.depth) {
            return Err(Error::Config(
                "depth value must be between 1 and 255".into(),
            ));
        }
        if self.pattern_divisor <= 1.0 {
            return Err(Error::Config(
                "pattern length divisor must be greater than 1.0".into(),
            ));
        }

        // A depth map wins over a font when both are given; a stray text
        // argument next to a depth map is rejected as ambiguous.
        let depth = match (self.depth_map, self.font) {
            (None, None) => {
                return Err(Error::Config(
                    "specify -f <font> with a text string, or -m <depth map>".into(),
                ))
            }
            (Some(_), _) if self.text.is_some() => {
                return Err(Error::Config(
                    "specify just a string and font pair, or a depth map, not both".into(),
                ))
            }
            (Some(path), _) => DepthSource::Map { path },
            (None, Some(font_path)) => DepthSource::Text {
                font_path,
                size: self.font_size as u32,
                text: self.text.unwrap_or_else(|| "Hello, world!".to_string()),
                value: self.depth as u8,
            },
        };

        Ok(Settings {
            width: self.width as u32,
            height: self.height as u32,
            tile_path: self.tile,
            output_path: self.output,
            cross_eyed: self.cross_eyed,
            pattern_divisor: self.pattern_divisor,
            depth,
        })
    }
}
