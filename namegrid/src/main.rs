use std::env;
use std::fs;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use namegrid_core::{
    DeterministicTextMeasurer, FormInputs, GridLayout, GridParams, Notice, TextMeasurer,
};
use namegrid_svg::{Placement, Session, UsvgMeasurer};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum TextMeasurerKind {
    #[default]
    Usvg,
    Deterministic,
}

#[derive(Debug, Default)]
struct Args {
    template: Option<String>,
    names: Option<String>,
    out: Option<String>,
    cell_width: Option<String>,
    page_width: Option<String>,
    max_font_size: Option<String>,
    label_width: Option<String>,
    config: Option<String>,
    fonts: Vec<String>,
    text_measurer: TextMeasurerKind,
    report: Option<String>,
    verbose: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    file_name: &'a str,
    layout: &'a GridLayout,
    placements: &'a [Placement],
    notices: &'a [Notice],
}

fn usage() -> &'static str {
    "namegrid\n\
\n\
USAGE:\n\
  namegrid --template <template.svg> [--names <file>|-] [--out <path>|-]\n\
           [--cell-width <cm>] [--page-width <cm>] [--max-font-size <cm>] [--label-width <fraction>]\n\
           [--config <params.json>] [--font <path>]... [--text-measurer usvg|deterministic]\n\
           [--report <path>] [--verbose]\n\
\n\
NOTES:\n\
  - Names are read one per line; without --names (or with '-') they come from stdin.\n\
  - The grid is written next to the template as <template>-name-tags.svg unless --out is given.\n\
  - Flags override values from --config; blank font size and label width use the template's own.\n\
  - RUST_LOG controls log output (default: warn, --verbose: debug).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, &'static str> {
    let mut args = Args::default();
    let mut it = argv.iter().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().cloned().ok_or(usage());
        match flag.as_str() {
            "--help" | "-h" => return Err(usage()),
            "--template" => args.template = Some(value()?),
            "--names" => args.names = Some(value()?),
            "--out" => args.out = Some(value()?),
            "--cell-width" => args.cell_width = Some(value()?),
            "--page-width" => args.page_width = Some(value()?),
            "--max-font-size" => args.max_font_size = Some(value()?),
            "--label-width" => args.label_width = Some(value()?),
            "--config" => args.config = Some(value()?),
            "--font" => args.fonts.push(value()?),
            "--report" => args.report = Some(value()?),
            "--text-measurer" => {
                args.text_measurer = match value()?.as_str() {
                    "usvg" => TextMeasurerKind::Usvg,
                    "deterministic" => TextMeasurerKind::Deterministic,
                    _ => return Err(usage()),
                }
            }
            "--verbose" | "-v" => args.verbose = true,
            _ => return Err(usage()),
        }
    }
    if args.template.is_none() {
        return Err(usage());
    }
    Ok(args)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

fn read_names(source: Option<&str>) -> std::io::Result<String> {
    match source {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => fs::read_to_string(path),
    }
}

/// Config file values first, then any flag given on the command line.
fn form_inputs(args: &Args, names: String) -> Result<FormInputs, Box<dyn std::error::Error>> {
    let params: GridParams = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => GridParams::default(),
    };
    let mut form = params.form_inputs(names);
    let overrides = [
        (&args.cell_width, &mut form.cell_width),
        (&args.page_width, &mut form.page_width),
        (&args.max_font_size, &mut form.max_font_size),
        (&args.label_width, &mut form.label_width),
    ];
    for (flag, field) in overrides {
        if let Some(v) = flag {
            *field = v.clone();
        }
    }
    Ok(form)
}

fn build_session(args: &Args) -> std::io::Result<Session> {
    let geometry = match (args.text_measurer, args.fonts.is_empty()) {
        (TextMeasurerKind::Deterministic, true) => UsvgMeasurer::without_fonts(),
        (_, true) => UsvgMeasurer::with_system_fonts(),
        (_, false) => UsvgMeasurer::with_font_files(args.fonts.as_slice())?,
    };
    let text: Box<dyn TextMeasurer> = match args.text_measurer {
        TextMeasurerKind::Deterministic => Box::new(DeterministicTextMeasurer::default()),
        TextMeasurerKind::Usvg if geometry.has_fonts() => Box::new(geometry.clone()),
        TextMeasurerKind::Usvg => {
            tracing::warn!("no fonts available, using fixed-width text metrics");
            Box::new(DeterministicTextMeasurer::default())
        }
    };
    Ok(Session::new(text, Box::new(geometry)))
}

fn default_out_path(template: &Path, file_name: &str) -> PathBuf {
    template.with_file_name(file_name)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let template_path = PathBuf::from(args.template.as_deref().unwrap_or_default());
    let template_text = fs::read_to_string(&template_path)?;
    let names = read_names(args.names.as_deref())?;
    let form = form_inputs(&args, names)?;

    let mut session = build_session(&args)?;
    let upload_name = template_path.file_name().and_then(|n| n.to_str());
    let loaded = session.load_template(upload_name, &template_text)?;
    for notice in &loaded.notices {
        tracing::warn!("{notice}");
    }

    let Some(output) = session.rebuild(&form)? else {
        return Err("Please upload an SVG template.".into());
    };
    for notice in &output.notices {
        tracing::warn!("{notice}");
    }
    for p in output.document.placements.iter().filter(|p| !p.fits) {
        tracing::warn!(name = %p.name, "label overflows its cell at the minimum font size");
    }

    let out = args
        .out
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_out_path(&template_path, &output.file_name));
    if out.as_os_str() == "-" {
        print!("{}", output.svg);
    } else {
        fs::write(&out, &output.svg)?;
    }

    if let Some(path) = &args.report {
        let report = Report {
            file_name: &output.file_name,
            layout: &output.document.layout,
            placements: &output.document.placements,
            notices: &output.notices,
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
    }

    let layout = &output.document.layout;
    eprintln!(
        "{} name tags, {} column(s) x {} row(s), {:.2} x {:.2} px -> {}",
        output.document.placements.len(),
        layout.columns,
        layout.rows,
        layout.canvas_width,
        layout.canvas_height,
        out.display()
    );
    Ok(())
}

fn main() {
    let args = match parse_args(&env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };
    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
