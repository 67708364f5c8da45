//! Render rasterizer scenes to image files and compare images pixel by pixel.
//!
//! ```text
//! pixel-compare render <scene> <width> <height> [params...] [-o out.bmp] [--bits 32] [--tier generic]
//! pixel-compare compare <a.bmp> <b.bmp> [-d diff.bmp] [-s sidebyside.bmp]
//! pixel-compare verify <scene> <width> <height> [params...] [--reference ref.bmp]
//! pixel-compare list
//! ```
//!
//! `verify` without a reference renders the scene with both filler tiers
//! and requires identical output.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pixel_compare::render::{available_scenes, render_scene, SceneOptions};
use pixel_compare::{
    compare_buffers, generate_diff_image, generate_sidebyside, load_image, save_image,
    CompareResult, PixelBuffer,
};
use poly3d_rust::{FillerTier, PixelFormat};

#[derive(Parser)]
#[command(name = "pixel-compare")]
#[command(about = "Render rasterizer scenes and compare images pixel by pixel", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene to an image file
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output file (.bmp, .raw or .rgba)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare two image files
    Compare {
        a: PathBuf,
        b: PathBuf,

        /// Write a diff image
        #[arg(short, long)]
        diff: Option<PathBuf>,

        /// Write an [A | diff | B] image
        #[arg(short, long)]
        sidebyside: Option<PathBuf>,
    },
    /// Render a scene and check it against a reference image, or against
    /// the other filler tier
    Verify {
        #[command(flatten)]
        scene: SceneArgs,

        /// Reference image to compare with
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Write a diff image
        #[arg(short, long)]
        diff: Option<PathBuf>,
    },
    /// List scene names
    List,
}

#[derive(Args)]
struct SceneArgs {
    scene: String,
    width: u32,
    height: u32,

    /// Scene parameters
    #[arg(allow_negative_numbers = true)]
    params: Vec<f64>,

    /// Target bits per pixel: 8, 15, 16, 24 or 32
    #[arg(long, default_value = "32")]
    bits: u32,

    #[arg(long, value_enum, default_value = "accelerated")]
    tier: Tier,

    /// Start spans at the vertex instead of the first pixel center
    #[arg(long)]
    no_subpixel: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Tier {
    Generic,
    Accelerated,
}

impl From<Tier> for FillerTier {
    fn from(t: Tier) -> Self {
        match t {
            Tier::Generic => FillerTier::Generic,
            Tier::Accelerated => FillerTier::Accelerated,
        }
    }
}

impl SceneArgs {
    fn options(&self, tier: FillerTier) -> Result<SceneOptions, String> {
        let format = PixelFormat::from_depth(self.bits)
            .ok_or_else(|| format!("unsupported color depth: {}", self.bits))?;
        Ok(SceneOptions {
            width: self.width,
            height: self.height,
            format,
            tier,
            subpixel: !self.no_subpixel,
        })
    }

    fn render(&self, tier: FillerTier) -> Result<PixelBuffer, String> {
        let opts = self.options(tier)?;
        render_scene(&self.scene, &opts, &self.params).ok_or_else(|| {
            format!("cannot render '{}'; use 'list' to see available scenes", self.scene)
        })
    }
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Render { scene, output } => cmd_render(&scene, output),
        Commands::Compare {
            a,
            b,
            diff,
            sidebyside,
        } => cmd_compare(&a, &b, diff.as_deref(), sidebyside.as_deref()),
        Commands::Verify {
            scene,
            reference,
            diff,
        } => cmd_verify(&scene, reference.as_deref(), diff.as_deref()),
        Commands::List => {
            println!("Available scenes:");
            for name in available_scenes() {
                println!("  {name}");
            }
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    }
}

fn save(path: &Path, buf: &PixelBuffer) -> Result<(), String> {
    save_image(path, buf).map_err(|e| format!("{}: {e}", path.display()))?;
    println!("Saved: {}", path.display());
    Ok(())
}

fn load(path: &Path) -> Result<PixelBuffer, String> {
    load_image(path).map_err(|e| format!("{}: {e}", path.display()))
}

fn cmd_render(args: &SceneArgs, output: Option<PathBuf>) -> Result<bool, String> {
    let buf = args.render(args.tier.into())?;
    let output = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "{}_{}x{}_{}bpp.bmp",
            args.scene, args.width, args.height, args.bits
        ))
    });
    save(&output, &buf)?;
    Ok(true)
}

fn cmd_compare(
    a: &Path,
    b: &Path,
    diff: Option<&Path>,
    sidebyside: Option<&Path>,
) -> Result<bool, String> {
    let a = load(a)?;
    let b = load(b)?;
    let result = compare_buffers(&a, &b).map_err(|e| e.to_string())?;
    println!("{result}");

    if let Some(path) = diff {
        save(path, &generate_diff_image(&a, &b).map_err(|e| e.to_string())?)?;
    }
    if let Some(path) = sidebyside {
        save(path, &generate_sidebyside(&a, &b).map_err(|e| e.to_string())?)?;
    }
    Ok(result.identical)
}

fn cmd_verify(args: &SceneArgs, reference: Option<&Path>, diff: Option<&Path>) -> Result<bool, String> {
    let (ours, theirs) = match reference {
        Some(path) => (args.render(args.tier.into())?, load(path)?),
        None => (
            args.render(FillerTier::Accelerated)?,
            args.render(FillerTier::Generic)?,
        ),
    };

    let result = compare_buffers(&ours, &theirs).map_err(|e| e.to_string())?;
    println!("{result}");

    if let Some(path) = diff {
        save(path, &generate_diff_image(&ours, &theirs).map_err(|e| e.to_string())?)?;
    }
    if !result.identical {
        let path = PathBuf::from(format!(
            "{}_sidebyside_{}x{}.bmp",
            args.scene, args.width, args.height
        ));
        save(&path, &generate_sidebyside(&ours, &theirs).map_err(|e| e.to_string())?)?;
        print_histogram(&result);
        return Ok(false);
    }

    println!("PIXEL-PERFECT MATCH");
    Ok(true)
}

fn print_histogram(result: &CompareResult) {
    println!("\nDifference histogram:");
    for (diff, &count) in result.diff_histogram.iter().enumerate() {
        if count > 0 {
            println!("  diff={diff}: {count} channels");
        }
    }
}
