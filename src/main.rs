use clap::{Parser, Subcommand};
use lazy_srcset::{cache, config, generator, markup, source, srcset};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup; trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Shared flags for commands that resolve a plan.
#[derive(clap::Args, Clone)]
struct PlanArgs {
    /// Source image file
    image: PathBuf,

    /// Named config from srcset.toml to resolve
    #[arg(long, default_value = "default")]
    config: String,

    /// Relative width hints in percent, aligned to breakpoints largest-first
    /// (e.g. --hints 25,33,50)
    #[arg(long, value_delimiter = ',')]
    hints: Vec<u32>,
}

#[derive(Parser)]
#[command(name = "lazy-srcset")]
#[command(about = "Plan and generate responsive image variants")]
#[command(long_about = "\
Plan and generate responsive image variants

Named configs in srcset.toml declare breakpoints; planning turns a source
image plus a config into a deduplicated, descending list of target widths
and the <img> markup that addresses them. Variants are generated under
deterministic names, so repeated runs reuse existing files.

Run 'lazy-srcset gen-config' to print a documented srcset.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Path to the srcset configuration file
    #[arg(long, default_value = "srcset.toml", global = true)]
    config_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the variant plan and <img> markup for an image
    Plan {
        #[command(flatten)]
        args: PlanArgs,
        /// Emit the plan as JSON instead of markup
        #[arg(long)]
        json: bool,
        /// Alt text for the rendered markup
        #[arg(long, default_value = "")]
        alt: String,
    },
    /// Generate variant files for one or more images
    Generate {
        /// Source image files
        images: Vec<PathBuf>,
        #[arg(long, default_value = "default")]
        config: String,
        #[arg(long, value_delimiter = ',')]
        hints: Vec<u32>,
        /// Output directory for generated variants
        #[arg(long, default_value = "srcset-cache")]
        out: PathBuf,
    },
    /// Delete variants whose source image no longer exists
    Cleanup {
        /// Directory holding generated variants
        #[arg(long, default_value = "srcset-cache")]
        out: PathBuf,
        /// Directory containing the source images
        #[arg(long, default_value = ".")]
        media_root: PathBuf,
        /// Report what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a stock srcset.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Plan { args, json, alt } => {
            let registry = config::ConfigRegistry::load(&cli.config_file)?;
            let image = source::probe(&args.image)?;

            if !image.is_raster() {
                let markup = markup::svg_markup(&image, &image.reference, &alt);
                println!("{}", markup.into_string());
                return Ok(());
            }
            if !registry.enabled {
                let markup = markup::plain_markup(&image, &image.reference, &alt);
                println!("{}", markup.into_string());
                return Ok(());
            }

            let resolved = registry.resolve(&args.config)?;
            let hints = hint_slice(&args.hints);
            let descriptors = srcset::build(&image, &resolved, hints)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&descriptors)?);
            } else {
                let markup = markup::img_markup(&descriptors, &resolved, hints, &alt, |d| {
                    variant_name(&args.image, d, &resolved)
                });
                println!("{}", markup.into_string());
            }
        }
        Command::Generate {
            images,
            config: config_name,
            hints,
            out,
        } => {
            let registry = config::ConfigRegistry::load(&cli.config_file)?;
            if !registry.enabled {
                println!("srcset generation is disabled in {}", cli.config_file.display());
                return Ok(());
            }
            let resolved = registry.resolve(&config_name)?;
            let generators = generator::GeneratorRegistry::with_builtins();
            let hints = hint_slice(&hints);

            std::fs::create_dir_all(&out)?;

            // Plan sequentially, generate in parallel.
            let mut jobs = Vec::new();
            for image_path in &images {
                let image = source::probe(image_path)?;
                if !image.is_raster() {
                    println!("{}: vector source, nothing to generate", image_path.display());
                    continue;
                }
                for descriptor in srcset::build(&image, &resolved, hints)? {
                    let output = out.join(variant_name(image_path, &descriptor, &resolved));
                    jobs.push((image_path.clone(), descriptor, output));
                }
            }

            let results: Vec<_> = jobs
                .par_iter()
                .map(|(image_path, descriptor, output)| {
                    if output.exists() {
                        return Ok(None);
                    }
                    let strategy = generators.get(&descriptor.generator)?;
                    let params = generator::GenerateParams::from_descriptor(
                        descriptor, &resolved, image_path, output,
                    );
                    strategy.generate(&params).map(Some)
                })
                .collect();

            let mut generated = 0u32;
            let mut reused = 0u32;
            for result in results {
                match result? {
                    Some(image) => {
                        println!("{} ({}x{})", image.path.display(), image.width, image.height);
                        generated += 1;
                    }
                    None => reused += 1,
                }
            }
            println!("{generated} generated, {reused} reused");
        }
        Command::Cleanup {
            out,
            media_root,
            dry_run,
        } => {
            let (stats, removed) = cache::cleanup(&out, &media_root, dry_run)?;
            for path in &removed {
                println!("{}: {}", if dry_run { "would delete" } else { "deleted" }, path.display());
            }
            println!("{stats}");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Treat an empty `--hints` list as "no hints".
fn hint_slice(hints: &[u32]) -> Option<&[u32]> {
    (!hints.is_empty()).then_some(hints)
}

/// Deterministic variant file name for a planned descriptor.
fn variant_name(
    source_path: &Path,
    descriptor: &srcset::VariantDescriptor,
    config: &config::SrcsetConfig,
) -> String {
    cache::variant_file_name(
        source_path,
        &cache::VariantKey {
            source: &descriptor.source,
            width: descriptor.width,
            generator: &descriptor.generator,
            quality: config.quality,
            format: config.format,
        },
    )
}
