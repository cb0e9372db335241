use clap::Parser;
use interstellar_trip_calculator::export::sweep::{SweepRecord, read_csv};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plot reaction-mass ratio and peak velocity from a sweep CSV"
)]
struct Cli {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "artifacts/sweep.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 900)]
    height: u32,
}

struct Panel<'a> {
    caption: &'a str,
    y_desc: &'a str,
    color: RGBColor,
    points: Vec<(f64, f64)>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let records = read_csv(&cli.input)?;
    let usable: Vec<&SweepRecord> = records
        .iter()
        .filter(|r| r.exhaust_fraction_c.is_finite() && r.mass_ratio > 0.0)
        .collect();
    if usable.is_empty() {
        return Err(anyhow::anyhow!(
            "No plottable sweep rows in {}",
            cli.input.display()
        ));
    }
    log::info!("plotting {} sweep points", usable.len());

    let panels = [
        Panel {
            caption: "Reaction mass",
            y_desc: "log10(Mthrust / Mship)",
            color: RGBColor(200, 30, 30),
            points: usable
                .iter()
                .map(|r| (r.exhaust_fraction_c, r.mass_ratio.log10()))
                .collect(),
        },
        Panel {
            caption: "Peak velocity",
            y_desc: "Vmax (C)",
            color: RGBColor(30, 60, 200),
            points: usable
                .iter()
                .map(|r| (r.exhaust_fraction_c, r.peak_velocity_fraction_c))
                .collect(),
        },
    ];

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let font_family = select_font_family();
    let (upper, lower) = root.split_vertically((cli.height / 2) as i32);
    draw_panel(&upper, &panels[0], font_family)?;
    draw_panel(&lower, &panels[1], font_family)?;

    root.present()?;
    println!("Wrote {}", cli.output.display());
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel<'_>,
    font_family: FontFamily<'static>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let caption_font = FontDesc::new(font_family, 22.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 16.0, FontStyle::Normal);

    let x_range = padded_range(panel.points.iter().map(|p| p.0));
    let y_range = padded_range(panel.points.iter().map(|p| p.1));

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .caption(panel.caption, caption_font)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Exhaust velocity (C)")
        .y_desc(panel.y_desc)
        .label_style(label_font)
        .draw()?;

    chart.draw_series(std::iter::once(PathElement::new(
        panel.points.clone(),
        ShapeStyle::from(&panel.color).stroke_width(2),
    )))?;
    chart.draw_series(
        panel
            .points
            .iter()
            .map(|&p| Circle::new(p, 4, panel.color.filled())),
    )?;
    Ok(())
}

/// Axis range covering every value, widened so single points and flat series still plot.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = if max - min > f64::EPSILON {
        0.05 * (max - min)
    } else {
        0.5_f64.max(0.05 * max.abs())
    };
    (min - pad)..(max + pad)
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}
