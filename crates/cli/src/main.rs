use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use segint::batch::intersect_batch;
use segint::codec::{self, CoordFormat};
use segint::intersect::point_total;
use segint::numeric::DEFAULT_DECIMAL_PRECISION;
use segint::stats::InputStats;
use segint::{
    Backend, DecimalBackend, DoubleBackend, EngineCfg, IntersectionRecord, Intersector,
    RationalBackend, Scalar, Segment,
};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod measure;
mod provenance;

use measure::Measurement;

#[derive(Parser)]
#[command(name = "segint")]
#[command(about = "Pairwise segment intersection over double, decimal and rational arithmetic")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Intersect all segment pairs of one file and print points or timings
    Run(RunArgs),
    /// Print descriptive statistics (one JSON object per file)
    Stat {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    Double,
    Decimal,
    Rational,
    /// Columnar double engine
    Vectorized,
}

#[derive(Args, Clone, Copy, Debug, Default)]
struct FormatArgs {
    /// Coordinates are 32-digit single-precision bit strings
    #[arg(long)]
    single: bool,
    /// Coordinates are plain decimal numbers instead of bit strings
    #[arg(long, conflicts_with = "single")]
    plain: bool,
}

impl FormatArgs {
    fn coord_format(self) -> CoordFormat {
        match (self.single, self.plain) {
            (_, true) => CoordFormat::Plain,
            (true, false) => CoordFormat::Bits32,
            (false, false) => CoordFormat::Bits64,
        }
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Segment CSV (`x1;y1;x2;y2`)
    #[arg(short = 'f', long)]
    file: PathBuf,
    #[arg(long, value_enum, default_value_t = BackendArg::Double)]
    backend: BackendArg,
    /// Significant digits for the decimal backend
    #[arg(long)]
    precision: Option<u64>,
    /// Relax the parametric bounds to [-tol, 1 + tol]
    #[arg(long, default_value_t = 0.0)]
    tolerance: f64,
    #[command(flatten)]
    format: FormatArgs,
    /// Print the intersection points instead of count/time/memory
    #[arg(short = 'a', long)]
    accuracy: bool,
    /// Print points as 64-bit bit strings
    #[arg(long, requires = "accuracy")]
    binary: bool,
    /// Print the parsed segments as plain CSV and exit
    #[arg(short = 'e', long)]
    echo: bool,
    /// Also write the points CSV here, with a provenance sidecar
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run(args) => run(&args, &mut io::stdout().lock()),
        Action::Stat { files, format } => stat(&files, format, &mut io::stdout().lock()),
        Action::Report => report(),
    }
}

fn validate_input(path: &Path) -> Result<()> {
    if path.extension().and_then(|e| e.to_str()) != Some("csv") {
        bail!("{} is not a CSV file", path.display());
    }
    if !path.is_file() {
        bail!("the file {} does not exist", path.display());
    }
    Ok(())
}

fn run<W: Write>(args: &RunArgs, w: &mut W) -> Result<()> {
    validate_input(&args.file)?;
    if args.precision.is_some() && args.backend != BackendArg::Decimal {
        bail!("--precision only applies to the decimal backend");
    }
    if args.tolerance != 0.0 && args.backend == BackendArg::Vectorized {
        bail!("the vectorized backend has no tolerance");
    }

    let segments = input::read_segments(&args.file, args.format.coord_format())?;
    if args.echo {
        codec::write_segments(w, &segments, CoordFormat::Plain)?;
        return Ok(());
    }

    tracing::info!(
        file = %args.file.display(),
        backend = ?args.backend,
        tolerance = args.tolerance,
        segments = segments.len(),
        "run"
    );
    match args.backend {
        BackendArg::Double => run_engine(&DoubleBackend, &segments, args, w),
        BackendArg::Decimal => {
            let precision = args.precision.unwrap_or(DEFAULT_DECIMAL_PRECISION);
            run_engine(&DecimalBackend::new(precision)?, &segments, args, w)
        }
        BackendArg::Rational => run_engine(&RationalBackend, &segments, args, w),
        BackendArg::Vectorized => {
            let (records, m) = measure::measure(|| intersect_batch(&segments));
            emit(&records, m, args, "vectorized", w)
        }
    }
}

/// Lift outside the timed region; only the all-pairs pass is measured.
fn run_engine<B: Backend, W: Write>(
    backend: &B,
    segments: &[Segment<f64>],
    args: &RunArgs,
    w: &mut W,
) -> Result<()> {
    let lifted = segments
        .iter()
        .map(|s| s.lift(backend))
        .collect::<segint::Result<Vec<_>>>()
        .with_context(|| format!("lifting input into the {} backend", backend.name()))?;
    let engine = Intersector::new(backend, EngineCfg::with_tolerance(args.tolerance))?;
    let (records, m) = measure::measure(|| engine.all_pairs(&lifted));
    emit(&records, m, args, backend.name(), w)
}

fn emit<T: Scalar, W: Write>(
    records: &[IntersectionRecord<T>],
    m: Measurement,
    args: &RunArgs,
    backend: &str,
    w: &mut W,
) -> Result<()> {
    let total = point_total(records);
    tracing::info!(
        records = records.len(),
        points = total,
        elapsed_ms = m.elapsed_ms as u64,
        memory_delta = m.memory_delta,
        "done"
    );

    if let Some(out) = &args.out {
        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
        let mut file = BufWriter::new(file);
        codec::write_points(&mut file, records, args.binary)?;
        file.flush()?;
        let params = serde_json::json!({
            "backend": backend,
            "precision": args.precision,
            "tolerance": args.tolerance,
            "format": format!("{:?}", args.format.coord_format()),
            "points": total,
            "elapsed_ms": m.elapsed_ms as u64,
        });
        let payload = provenance::Payload::new(params).with_input(args.file.display().to_string());
        provenance::write_sidecar(out, payload)?;
    }

    if args.accuracy {
        codec::write_points(w, records, args.binary)?;
    } else {
        writeln!(w, "{total}")?;
        writeln!(w, "{}", m.elapsed_ms)?;
        writeln!(w, "{}", m.memory_delta)?;
    }
    w.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct StatRow {
    file: String,
    #[serde(flatten)]
    stats: InputStats,
}

fn stat<W: Write>(files: &[PathBuf], format: FormatArgs, w: &mut W) -> Result<()> {
    for path in files {
        validate_input(path)?;
        let segments = input::read_segments(path, format.coord_format())?;
        let row = StatRow {
            file: path.display().to_string(),
            stats: InputStats::collect(&segments),
        };
        writeln!(w, "{}", serde_json::to_string(&row)?)?;
    }
    Ok(())
}

fn report() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&provenance::report())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::tempdir;

    const CROSS: &str = "x1;y1;x2;y2\n10;10;90;90\n10;90;90;10\n10;50;90;50\n10;50;90;50\n";

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["segint", "run"];
        full.extend_from_slice(argv);
        match Cmd::try_parse_from(full).unwrap().action {
            Action::Run(args) => args,
            _ => panic!("expected run"),
        }
    }

    fn plain_file(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn output(args: &RunArgs) -> String {
        let mut buf = Vec::new();
        run(args, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn parse_defaults() {
        let args = run_args(&["-f", "in.csv"]);
        assert_eq!(args.backend, BackendArg::Double);
        assert_eq!(args.tolerance, 0.0);
        assert_eq!(args.format.coord_format(), CoordFormat::Bits64);
        assert!(!args.accuracy);
    }

    #[test]
    fn parse_rejects_conflicting_formats() {
        assert!(Cmd::try_parse_from(["segint", "run", "-f", "a.csv", "--single", "--plain"]).is_err());
        assert!(Cmd::try_parse_from(["segint", "run", "-f", "a.csv", "--binary"]).is_err());
        assert!(Cmd::try_parse_from(["segint", "run", "-f", "a.csv", "--backend", "quad"]).is_err());
    }

    #[test]
    fn input_must_be_existing_csv() {
        let dir = tempdir().unwrap();
        let txt = plain_file(dir.path(), "segs.txt", CROSS);
        assert!(validate_input(&txt).is_err());
        assert!(validate_input(&dir.path().join("missing.csv")).is_err());
        let csv = plain_file(dir.path(), "segs.csv", CROSS);
        assert!(validate_input(&csv).is_ok());
    }

    #[test]
    fn count_mode_prints_three_lines() {
        let dir = tempdir().unwrap();
        let csv = plain_file(dir.path(), "segs.csv", CROSS);
        let file = csv.to_str().unwrap();
        for backend in ["double", "decimal", "rational", "vectorized"] {
            let out = output(&run_args(&["-f", file, "--plain", "--backend", backend]));
            let lines: Vec<&str> = out.lines().collect();
            assert_eq!(lines.len(), 3, "{backend}");
            // 5 crossings at (50,50) plus one overlap counted twice
            assert_eq!(lines[0], "7", "{backend}");
            assert!(lines[1].parse::<u128>().is_ok());
            assert!(lines[2].parse::<i64>().is_ok());
        }
    }

    #[test]
    fn accuracy_mode_prints_points() {
        let dir = tempdir().unwrap();
        let csv = plain_file(dir.path(), "segs.csv", "x1;y1;x2;y2\n10;10;90;90\n10;90;90;10\n");
        let out = output(&run_args(&["-f", csv.to_str().unwrap(), "--plain", "-a", "--backend", "rational"]));
        assert_eq!(out, "p_x;p_y\n50;50\n");

        let bin = output(&run_args(&["-f", csv.to_str().unwrap(), "--plain", "-a", "--binary"]));
        let line = bin.lines().nth(1).unwrap();
        assert_eq!(line, format!("{};{}", codec::encode_bits(50.0), codec::encode_bits(50.0)));
    }

    #[test]
    fn exact_backends_print_numeric_points() {
        let dir = tempdir().unwrap();
        let csv = plain_file(dir.path(), "half.csv", "x1;y1;x2;y2\n0;0;1;1\n0;1;1;0\n");
        let file = csv.to_str().unwrap();
        for backend in ["rational", "decimal", "double", "vectorized"] {
            let out = output(&run_args(&["-f", file, "--plain", "-a", "--backend", backend]));
            assert_eq!(out, "p_x;p_y\n0.5;0.5\n", "{backend}");
            let fields: Vec<f64> = out
                .lines()
                .nth(1)
                .unwrap()
                .split(';')
                .map(|f| f.parse().unwrap())
                .collect();
            assert_eq!(fields, vec![0.5, 0.5]);
        }
    }

    #[test]
    fn echo_prints_plain_segments() {
        let dir = tempdir().unwrap();
        let body = format!(
            "x1;y1;x2;y2\n{};{};{};{}\n",
            codec::encode_bits(0.5),
            codec::encode_bits(-1.0),
            codec::encode_bits(2.0),
            codec::encode_bits(3.0)
        );
        let csv = plain_file(dir.path(), "bits.csv", &body);
        let out = output(&run_args(&["-f", csv.to_str().unwrap(), "-e"]));
        assert_eq!(out, "x1;y1;x2;y2\n0.5;-1;2;3\n");
    }

    #[test]
    fn backend_specific_flags_are_checked() {
        let dir = tempdir().unwrap();
        let csv = plain_file(dir.path(), "segs.csv", CROSS);
        let file = csv.to_str().unwrap();
        let mut sink = Vec::new();
        assert!(run(&run_args(&["-f", file, "--plain", "--precision", "5"]), &mut sink).is_err());
        assert!(run(
            &run_args(&["-f", file, "--plain", "--backend", "vectorized", "--tolerance", "1e-9"]),
            &mut sink
        )
        .is_err());
        assert!(run(
            &run_args(&["-f", file, "--plain", "--backend", "decimal", "--precision", "0"]),
            &mut sink
        )
        .is_err());
        let ok = output(&run_args(&["-f", file, "--plain", "--backend", "decimal", "--precision", "5"]));
        assert_eq!(ok.lines().next(), Some("7"));
    }

    #[test]
    fn out_writes_points_and_sidecar() {
        let dir = tempdir().unwrap();
        let csv = plain_file(dir.path(), "segs.csv", CROSS);
        let out_path = dir.path().join("res").join("points.csv");
        let args = run_args(&[
            "-f",
            csv.to_str().unwrap(),
            "--plain",
            "--backend",
            "rational",
            "--out",
            out_path.to_str().unwrap(),
        ]);
        output(&args);
        let points = fs::read_to_string(&out_path).unwrap();
        assert_eq!(points.lines().count(), 1 + 7);
        let sidecar = dir.path().join("res").join("points.provenance.json");
        let prov: Value = serde_json::from_slice(&fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(prov["params"]["backend"], "rational");
        assert_eq!(prov["params"]["points"], 7);
    }

    #[test]
    fn stat_prints_one_json_object_per_file() {
        let dir = tempdir().unwrap();
        let a = plain_file(dir.path(), "a.csv", CROSS);
        let b = plain_file(dir.path(), "b.csv", "x1;y1;x2;y2\n0;0;1;0\n");
        let mut buf = Vec::new();
        stat(&[a, b], FormatArgs { single: false, plain: true }, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let rows: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["segs"], 4);
        assert_eq!(rows[0]["overlap"], 1);
        assert_eq!(rows[0]["intersect"], 5);
        assert_eq!(rows[1]["combs"], 0);
        assert!(rows[1]["file"].as_str().unwrap().ends_with("b.csv"));
    }
}
