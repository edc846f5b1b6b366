//! End-to-end pipeline tests: probe → resolve → build → markup → generate →
//! cleanup, against real files in a temp directory.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use lazy_srcset::config::{ConfigRegistry, OutputFormat, RawConfig};
use lazy_srcset::generator::{GenerateParams, GeneratorRegistry};
use lazy_srcset::{cache, markup, source, srcset};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    });
    let file = fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

fn registry() -> ConfigRegistry {
    ConfigRegistry::default().with_config(
        "default",
        RawConfig {
            breakpoints: vec![320, 200, 160],
            quality: Some(85),
            threshold: Some(10),
            ..RawConfig::default()
        },
    )
}

fn variant_name(
    source_path: &Path,
    descriptor: &srcset::VariantDescriptor,
    config: &lazy_srcset::config::SrcsetConfig,
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

#[test]
fn raster_pipeline_plan_markup_generate_cleanup() {
    let tmp = TempDir::new().unwrap();
    let media = tmp.path().join("media");
    let out = tmp.path().join("cache");
    fs::create_dir_all(&media).unwrap();
    fs::create_dir_all(&out).unwrap();

    let photo = media.join("photo.jpg");
    write_jpeg(&photo, 400, 300);

    // Probe
    let image = source::probe(&photo).unwrap();
    assert_eq!(image.dimensions(), Some((400, 300)));
    assert!(image.is_raster());

    // Resolve + build: breakpoints all below the 400px bound, which joins
    // the set; every gap exceeds the threshold of 10.
    let config = registry().resolve("default").unwrap();
    let descriptors = srcset::build(&image, &config, None).unwrap();
    let widths: Vec<u32> = descriptors.iter().map(|d| d.width).collect();
    assert_eq!(widths, vec![400, 320, 200, 160]);

    // Markup
    let html = markup::img_markup(&descriptors, &config, None, "A photo", |d| {
        variant_name(&photo, d, &config)
    })
    .into_string();
    assert!(html.contains("srcset="));
    assert!(html.contains("400w"));
    assert!(html.contains("160w"));
    assert!(html.contains(r#"width="400""#));
    assert!(html.contains(r#"height="300""#));
    assert!(html.contains("sizes="));

    // Generate every variant through the built-in resize generator
    let generators = GeneratorRegistry::with_builtins();
    for descriptor in &descriptors {
        let output = out.join(variant_name(&photo, descriptor, &config));
        let generator = generators.get(&descriptor.generator).unwrap();
        let generated = generator
            .generate(&GenerateParams::from_descriptor(
                descriptor, &config, &photo, &output,
            ))
            .unwrap();
        assert_eq!(generated.width, descriptor.width);
        assert_eq!(Some(generated.height), descriptor.height);
        assert!(output.exists());
    }

    // Cleanup keeps variants while the source lives...
    let (stats, _) = cache::cleanup(&out, &media, false).unwrap();
    assert_eq!(stats.scanned, 4);
    assert_eq!(stats.deleted, 0);

    // ...and removes them all once it is gone.
    fs::remove_file(&photo).unwrap();
    let (stats, removed) = cache::cleanup(&out, &media, false).unwrap();
    assert_eq!(stats.deleted, 4);
    assert_eq!(removed.len(), 4);
}

#[test]
fn planning_is_idempotent_and_names_are_stable() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("photo.jpg");
    write_jpeg(&photo, 500, 500);

    let config = registry().resolve("default").unwrap();
    let image = source::probe(&photo).unwrap();

    let first = srcset::build(&image, &config, Some(&[50, 80])).unwrap();
    let second = srcset::build(&image, &config, Some(&[50, 80])).unwrap();
    assert_eq!(first, second);

    let names_first: Vec<String> = first.iter().map(|d| variant_name(&photo, d, &config)).collect();
    let names_second: Vec<String> = second.iter().map(|d| variant_name(&photo, d, &config)).collect();
    assert_eq!(names_first, names_second);
}

#[test]
fn format_conversion_produces_target_extension() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("photo.jpg");
    write_jpeg(&photo, 300, 200);

    let registry = ConfigRegistry::default().with_config(
        "png",
        RawConfig {
            breakpoints: vec![200],
            format: Some(OutputFormat::Png),
            ..RawConfig::default()
        },
    );
    let config = registry.resolve("png").unwrap();
    let image = source::probe(&photo).unwrap();
    let descriptors = srcset::build(&image, &config, None).unwrap();

    let generators = GeneratorRegistry::with_builtins();
    let mut outputs: Vec<PathBuf> = Vec::new();
    for descriptor in &descriptors {
        let name = variant_name(&photo, descriptor, &config);
        assert!(name.ends_with(".png"));
        let output = tmp.path().join(&name);
        generators
            .get(&descriptor.generator)
            .unwrap()
            .generate(&GenerateParams::from_descriptor(
                descriptor, &config, &photo, &output,
            ))
            .unwrap();
        outputs.push(output);
    }
    for output in outputs {
        assert_eq!(
            image::ImageReader::open(&output)
                .unwrap()
                .with_guessed_format()
                .unwrap()
                .format(),
            Some(image::ImageFormat::Png)
        );
    }
}

#[test]
fn svg_pipeline_renders_without_generation() {
    let tmp = TempDir::new().unwrap();
    let logo = tmp.path().join("logo.svg");
    fs::write(
        &logo,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 240 120"></svg>"#,
    )
    .unwrap();

    let image = source::probe(&logo).unwrap();
    assert!(!image.is_raster());
    assert_eq!(image.dimensions(), Some((240, 120)));

    // The planner passes the SVG through untouched
    let config = registry().resolve("default").unwrap();
    let descriptors = srcset::build(&image, &config, None).unwrap();
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].width, 240);

    // Markup comes straight from the source, no variants involved
    let html = markup::svg_markup(&image, "/static/logo.svg", "Logo").into_string();
    assert!(html.contains(r#"role="img""#));
    assert!(html.contains(r#"width="240""#));
    assert!(!html.contains("srcset"));
}

#[test]
fn disabled_mode_renders_plain_markup() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("photo.jpg");
    write_jpeg(&photo, 640, 480);

    let registry = ConfigRegistry::from_toml_str(
        r#"
enabled = false

[configs.default]
breakpoints = [320]
"#,
    )
    .unwrap();
    assert!(!registry.enabled);

    let image = source::probe(&photo).unwrap();
    let html = markup::plain_markup(&image, "/media/photo.jpg", "A photo").into_string();
    assert!(html.contains(r#"src="/media/photo.jpg""#));
    assert!(html.contains(r#"width="640""#));
    assert!(!html.contains("srcset"));
}
