//! Command line front end for the generator.

use anyhow::Context as _;
use clap::{ArgAction, Parser};
use detgen::GeneratorParams;
use detgen::tex::MatrixFormat;
use rand::{SeedableRng as _, rngs::StdRng};
use tracing_subscriber::EnvFilter;

const ABOUT: &str = "\
Randomize a matrix with the determinant value as a parameter. \
The output is LaTeX compatible.";

const LONG_ABOUT: &str = "\
Randomize a matrix with the determinant value as a parameter. The output is
LaTeX compatible.

This can be used e.g. by teachers in linear algebra who want to create
systems of equations that are easy to solve by hand, possibly avoiding
fractions (if det_value is chosen to be +-1).

When the dimension is 2 or 3 the difference between lower_bound and
upper_bound has to be at least 3 (except if lower_bound <= -1 and
upper_bound >= 1), which ensures that the problem is solvable. Otherwise the
difference has to be at least 2.

If the dimension is 7 or higher, it is recommended to set a few random
parameters to speed up the calculations. The randomness of the entries
decreases though.

The output can be used together with LaTeX environments such as pmatrix or
array, see --env.";

const AFTER_HELP: &str = "\
Examples:
  detgen
      A matrix of dimension 2 with determinant 1 and entries between -9 and 9.
        9 & -1 \\\\
        1 & 0
  detgen 5 -4
      A matrix of dimension 5 with determinant -4 and entries between -9 and 9.
  detgen 5 6 -3 14
      A matrix of dimension 5 with determinant 6 and entries between -3 and 13.
  detgen 7 6 -3 14 2 300
      A matrix of dimension 7 with determinant 6 and entries between -3 and 13.
      Two parameters are randomized, which makes the calculation faster, and
      300 sets of random rows are tried before giving up.
  detgen 3 --env pmatrix
      Wraps the output in \\begin{pmatrix} and \\end{pmatrix}.";

#[derive(Debug, Parser)]
#[command(name = "detgen", version, about = ABOUT, long_about = LONG_ABOUT)]
#[command(after_help = AFTER_HELP)]
struct Args {
    /// [dimension, det_value, lower_bound, upper_bound, rdn_prm, attempts]
    ///
    /// dimension: Dimension of the matrix. A non-positive value results in an
    /// empty matrix. Default is 2.
    ///
    /// det_value: Value of the determinant. Default is 1.
    ///
    /// lower_bound: Smallest allowed entry. Default is -9.
    ///
    /// upper_bound: Entries are at most upper_bound - 1. Default is 10.
    ///
    /// rdn_prm: Number of randomized parameters. Invalid values are treated
    /// as 0, which is the default.
    ///
    /// attempts: Number of sets of random rows that are tried before giving
    /// up. Invalid values are treated as the default of 200.
    #[arg(
        value_name = "PARAMETERS",
        allow_negative_numbers = true,
        verbatim_doc_comment,
    )]
    parameters: Vec<String>,

    /// Seed for the random number generator, for reproducible output.
    #[arg(long, env = "DETGEN_SEED")]
    seed: Option<u64>,

    /// Wrap the output in this LaTeX environment, e.g. pmatrix.
    #[arg(long, value_name = "NAME")]
    env: Option<String>,

    /// Put between the entries of a row.
    #[arg(long, value_name = "SEP")]
    column_separator: Option<String>,

    /// Put between the rows. Escapes like \n are not interpreted.
    #[arg(long, value_name = "SEP")]
    row_separator: Option<String>,

    /// Also put the row separator after the last row.
    #[arg(long)]
    trailing: bool,

    /// Log more to stderr. Can be repeated.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn format(&self) -> MatrixFormat {
        let mut format = MatrixFormat::default()
            .with_trailing_separator(self.trailing);
        if let Some(sep) = &self.column_separator {
            format = format.with_column_separator(sep.as_str());
        }
        if let Some(sep) = &self.row_separator {
            format = format.with_row_separator(sep.as_str());
        }
        if let Some(env) = &self.env {
            format = format.with_environment(env.as_str());
        }
        format
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "detgen=debug",
        _ => "detgen=trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Generates the matrix and formats it.
fn run(args: &Args) -> anyhow::Result<String> {
    let params = GeneratorParams::from_args(args.parameters.as_slice())
        .context("invalid parameters")?;

    tracing::debug!(?params, seed = args.seed, "parsed arguments");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let matrix = detgen::generate_matrix(&params, &mut rng)
        .with_context(|| format!(
            "failed to generate a matrix of dimension {} with determinant {}",
            params.dimension, params.det_value,
        ))?;

    Ok(matrix.to_tex_with(&args.format()).to_string())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    println!("{}", run(&args)?);
    Ok(())
}
