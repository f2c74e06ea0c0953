use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use image::{ImageReader, RgbaImage};
use serde::Deserialize;
use sprite_packer_core::{
    Algorithm, InvalidItemPolicy, Item, PackResult, PackerConfig, pack_items, to_json_array,
    to_json_hash, unique_sprite_names,
};
use tracing::{error, info, warn};
use walkdir::WalkDir;

mod compositing;

#[derive(Parser, Debug)]
#[command(
    name = "sprite-packer",
    about = "Pack sprites onto a single fixed-size canvas",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack images onto a canvas and write name.png + name.json
    Pack(PackArgs),
    /// Layout-only export (no PNG): compute placements and write JSON
    Layout(PackArgs),
    /// Simple timing bench (packs once per algorithm, prints time + fill ratio)
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Base name of the output files (name.png/.json)
    #[arg(short, long, default_value = "sprites", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (values in the file override CLI options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,
    /// Skip sprites smaller than WxH (either side)
    #[arg(long, value_parser = parse_size, help_heading = "Input/Output")]
    min_size: Option<SizeLimit>,
    /// Skip sprites larger than WxH (either side)
    #[arg(long, value_parser = parse_size, help_heading = "Input/Output")]
    max_size: Option<SizeLimit>,

    // Layout
    /// Canvas width
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    canvas_width: u32,
    /// Canvas height
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    canvas_height: u32,
    /// Pixels kept free to the right of and below each sprite
    #[arg(long, default_value_t = 2, help_heading = "Layout")]
    spacing: u32,
    /// Algorithm: shelf | guillotine | auto
    #[arg(long, value_parser = ["shelf", "ffdh", "guillotine", "binary", "auto"], default_value = "guillotine", help_heading = "Layout")]
    algorithm: String,
    /// Zero-sized images: error | report
    #[arg(long, value_parser = ["error", "report"], default_value = "error", help_heading = "Layout")]
    invalid_items: String,
    /// Evaluate auto candidates in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    parallel: bool,
    /// Draw red outlines around each sprite (debug)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    outlines: bool,

    // Export
    /// Metadata format: json-array | json (alias) | json-hash
    #[arg(long, default_value = "json-array", help_heading = "Export")]
    metadata: String,
    /// Prefix prepended to every sprite name
    #[arg(long, default_value = "", help_heading = "Export")]
    prefix: String,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
    #[arg(skip)]
    layout_only: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Input directory
    input: PathBuf,
    /// Canvas width
    #[arg(long, default_value_t = 1024)]
    canvas_width: u32,
    /// Canvas height
    #[arg(long, default_value_t = 1024)]
    canvas_height: u32,
    /// Spacing between sprites
    #[arg(long, default_value_t = 2)]
    spacing: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SizeLimit {
    w: u32,
    h: u32,
}

fn parse_size(s: &str) -> Result<SizeLimit, String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid size '{}': {}", s, e))
    };
    match s.split_once(['x', 'X']) {
        Some((w, h)) => Ok(SizeLimit {
            w: parse(w)?,
            h: parse(h)?,
        }),
        None => {
            let v = parse(s)?;
            Ok(SizeLimit { w: v, h: v })
        }
    }
}

fn yaml_size(v: Option<&str>) -> anyhow::Result<Option<SizeLimit>> {
    v.map(parse_size).transpose().map_err(anyhow::Error::msg)
}

/// Packing key: the sprite name, then its load index so equal names stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SpriteKey {
    name: String,
    index: usize,
}

impl fmt::Display for SpriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

struct Sprite {
    name: String,
    path: PathBuf,
    width: u32,
    height: u32,
    rgba: Option<RgbaImage>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet),
        Commands::Layout(args) => {
            let mut a = args.clone();
            a.layout_only = true;
            run_pack(&a, false)
        }
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let mut cfg = PackerConfig::builder()
        .with_canvas(cli.canvas_width, cli.canvas_height)
        .spacing(cli.spacing)
        .algorithm(cli.algorithm.parse()?)
        .invalid_items(cli.invalid_items.parse()?)
        .parallel(cli.parallel)
        .build();
    let mut min_size = cli.min_size;
    let mut max_size = cli.max_size;

    // Values from the config file override the command line field by field
    if let Some(path) = &cli.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        min_size = yaml_size(y.min_size.as_deref())?.or(min_size);
        max_size = yaml_size(y.max_size.as_deref())?.or(max_size);
        cfg = y.into_packer_config(cfg)?;
    }

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    if !cli.dry_run {
        fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
    }

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    let sprites = load_sprites_with_progress(&paths, !cli.layout_only, show_progress)?;
    let sprites = filter_by_size(sprites, min_size, max_size);
    info!(count = sprites.len(), "loaded input images");

    let items: Vec<Item<SpriteKey>> = sprites
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let key = SpriteKey {
                name: s.name.clone(),
                index,
            };
            Item::new(key, s.width, s.height)
        })
        .collect();
    let out = pack_items(items, cfg)?;

    let stats = out.stats();
    info!(
        algorithm = ?out.algorithm,
        placed = stats.num_placed,
        unplaced = stats.num_unplaced,
        used_area = stats.used_area,
        canvas_area = stats.canvas_area,
        fill = format!("{:.2}%", stats.fill_ratio),
        "stats"
    );

    if !cli.layout_only && !cli.dry_run {
        let canvas = composite(&out, &sprites, cli.outlines);
        let png_path = cli.out_dir.join(format!("{}.png", cli.name));
        canvas
            .save(&png_path)
            .with_context(|| format!("write {}", png_path.display()))?;
        info!(?png_path, "wrote canvas");
    }

    let json_value = match cli.metadata.as_str() {
        "json-array" | "json" => to_json_array(&out, &cli.prefix),
        "json-hash" => to_json_hash(&out, &cli.prefix),
        other => anyhow::bail!("unknown metadata format: {}", other),
    };
    if !cli.dry_run {
        let json_path = cli.out_dir.join(format!("{}.json", cli.name));
        let json = serde_json::to_string_pretty(&json_value)?;
        fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;
        info!(?json_path, sprites = out.placed.len(), "metadata written");
    } else {
        for (p, name) in out
            .placed
            .iter()
            .zip(unique_sprite_names(&out.placed, &cli.prefix))
        {
            info!(name = %name, x = p.frame.x, y = p.frame.y, w = p.frame.w, h = p.frame.h, "placed");
        }
    }

    if let Some(stats_path) = &cli.export_stats {
        if !cli.dry_run {
            fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        } else {
            println!("{}", stats.summary());
        }
    }

    report_leftovers(&out, &sprites);
    Ok(())
}

fn composite(out: &PackResult<SpriteKey>, sprites: &[Sprite], outlines: bool) -> RgbaImage {
    let mut canvas = compositing::blank_canvas(out.canvas_width, out.canvas_height);
    for p in &out.placed {
        match &sprites[p.key.index].rgba {
            Some(rgba) => compositing::blit_rgba(rgba, &mut canvas, p.frame, outlines),
            None => warn!(name = %p.key, "no pixels loaded"),
        }
    }
    canvas
}

fn report_leftovers(out: &PackResult<SpriteKey>, sprites: &[Sprite]) {
    if out.is_complete() {
        return;
    }
    println!(
        "{} sprite(s) did not fit on the {}x{} canvas:",
        out.unplaced.len() + out.rejected.len(),
        out.canvas_width,
        out.canvas_height
    );
    for u in &out.unplaced {
        let path = &sprites[u.item.key.index].path;
        println!(
            "  {} ({}x{}) {:?} [{}]",
            u.item.key,
            u.item.w,
            u.item.h,
            u.reason,
            path.display()
        );
    }
    for r in &out.rejected {
        let path = &sprites[r.item.key.index].path;
        println!(
            "  {} ({}x{}) {:?} [{}]",
            r.item.key,
            r.item.w,
            r.item.h,
            r.reason,
            path.display()
        );
    }
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    let paths = gather_paths(&b.input, &[], &[])?;
    let sprites = load_sprites_with_progress(&paths, false, false)?;
    if sprites.is_empty() {
        anyhow::bail!("no images found under {}", b.input.display());
    }
    let items: Vec<Item<String>> = sprites
        .iter()
        .map(|s| Item::new(s.name.clone(), s.width, s.height))
        .collect();

    for algorithm in [Algorithm::Shelf, Algorithm::Guillotine, Algorithm::Auto] {
        let cfg = PackerConfig::builder()
            .with_canvas(b.canvas_width, b.canvas_height)
            .spacing(b.spacing)
            .algorithm(algorithm)
            .invalid_items(InvalidItemPolicy::Report)
            .parallel(true)
            .build();
        let start = Instant::now();
        let out = pack_items(items.clone(), cfg)?;
        let dur = start.elapsed();
        println!(
            "{:?}: placed={} unplaced={} fill={:.2}% time={}",
            algorithm,
            out.placed.len(),
            out.unplaced.len(),
            out.fill_ratio(),
            bench_fmt_dur(dur)
        );
    }
    Ok(())
}

fn bench_fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let inc_set = build_globset(include)?;
    let exc_set = build_globset(exclude)?;
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<globset::GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat).with_context(|| format!("bad glob {}", pat))?);
    }
    Ok(Some(b.build()?))
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif")
    )
}

fn sprite_name(p: &Path) -> String {
    p.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.to_string_lossy().replace('\\', "/"))
}

/// Loads sizes for every path; pixels too when `decode` is set.
fn load_sprites_with_progress(
    paths: &[PathBuf],
    decode: bool,
    progress: bool,
) -> anyhow::Result<Vec<Sprite>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match load_sprite(p, decode) {
            Ok(sprite) => list.push(sprite),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_sprite(p: &Path, decode: bool) -> anyhow::Result<Sprite> {
    let reader = ImageReader::open(p)?.with_guessed_format()?;
    let (width, height, rgba) = if decode {
        let rgba = reader.decode()?.to_rgba8();
        let (w, h) = rgba.dimensions();
        (w, h, Some(rgba))
    } else {
        let (w, h) = reader.into_dimensions()?;
        (w, h, None)
    };
    Ok(Sprite {
        name: sprite_name(p),
        path: p.to_path_buf(),
        width,
        height,
        rgba,
    })
}

fn filter_by_size(
    sprites: Vec<Sprite>,
    min: Option<SizeLimit>,
    max: Option<SizeLimit>,
) -> Vec<Sprite> {
    sprites
        .into_iter()
        .filter(|s| {
            let too_small = min.is_some_and(|m| s.width < m.w || s.height < m.h);
            let too_large = max.is_some_and(|m| s.width > m.w || s.height > m.h);
            if too_small || too_large {
                info!(name = %s.name, w = s.width, h = s.height, too_small, too_large, "skip sprite (size filter)");
                return false;
            }
            true
        })
        .collect()
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    canvas_width: Option<u32>,
    canvas_height: Option<u32>,
    spacing: Option<u32>,
    algorithm: Option<String>,
    invalid_items: Option<String>,
    parallel: Option<bool>,
    min_size: Option<String>,
    max_size: Option<String>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> anyhow::Result<PackerConfig> {
        if let Some(v) = self.canvas_width {
            cfg.canvas_width = v;
        }
        if let Some(v) = self.canvas_height {
            cfg.canvas_height = v;
        }
        if let Some(v) = self.spacing {
            cfg.spacing = v;
        }
        if let Some(v) = self.algorithm {
            cfg.algorithm = v.parse()?;
        }
        if let Some(v) = self.invalid_items {
            cfg.invalid_items = v.parse()?;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}
