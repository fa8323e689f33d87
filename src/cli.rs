//! Command-line arguments of the `matmul` and `array_sum` binaries.
//!
//! clap does the tokenising; every failure, including a missing argument,
//! comes back as an [`ArgError`] so the binaries can print usage to stdout
//! and exit with status 1.

use std::ffi::OsString;

use clap::{error::ErrorKind, Parser};

use crate::{ArgError, MatmulConfig, SumConfig, Version, PRINT_LIMIT};

pub const MATMUL_USAGE: &str = "Arguments:<X> <Y> [<Z>]
X : Matrix size [X x X]
Y : Version (Sequential Version for Y is 1 or 2; Parallel Version for Y is 3 or 4)
Z = 1: print the input/output matrix if X <= 15";

pub const ARRAY_SUM_USAGE: &str = "Format: array_sum <size of array> <random seed>
Arguments:
  size of array - This is the size of the array to be generated and processed
  random seed   - This integer will be used to seed the random number
                  generator that will generate the contents of the array
                  to be processed";

#[derive(Parser, Debug)]
#[command(name = "matmul", disable_help_flag = true)]
pub struct MatmulArgs {
    /// Matrix size [N x N]
    #[arg(allow_negative_numbers = true)]
    pub n: i64,
    /// Kernel version, 1..=4
    #[arg(allow_negative_numbers = true)]
    pub version: i64,
    /// 1 prints the input and output matrices
    #[arg(allow_negative_numbers = true)]
    pub print: Option<i64>,
}

#[derive(Parser, Debug)]
#[command(name = "array_sum", disable_help_flag = true)]
pub struct SumArgs {
    #[arg(allow_negative_numbers = true)]
    pub array_size: i64,
    pub seed: u64,
}

impl TryFrom<MatmulArgs> for MatmulConfig {
    type Error = ArgError;

    fn try_from(args: MatmulArgs) -> Result<Self, Self::Error> {
        let version = Version::try_from(args.version);
        match (args.n, version) {
            (n, Ok(version)) if n > 0 => {
                let n = n as usize;
                let print = args.print == Some(1) && n <= PRINT_LIMIT;
                Ok(MatmulConfig::new(n, version, print))
            }
            (n, Ok(_)) => Err(ArgError::NonPositiveSize(n)),
            (n, Err(e)) if n > 0 => Err(e),
            (n, Err(_)) => Err(ArgError::SizeAndVersion {
                n,
                version: args.version,
            }),
        }
    }
}

impl TryFrom<SumArgs> for SumConfig {
    type Error = ArgError;

    fn try_from(args: SumArgs) -> Result<Self, Self::Error> {
        let array_size = usize::try_from(args.array_size)
            .map_err(|_| ArgError::NegativeArraySize(args.array_size))?;
        Ok(SumConfig::new(array_size, args.seed))
    }
}

fn parse<P, I, T>(args: I, required: usize) -> Result<P, ArgError>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let found = args.len().saturating_sub(1);
    P::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::MissingRequiredArgument => ArgError::Missing {
            expected: required,
            found,
        },
        _ => ArgError::Unparsable(e.to_string().lines().next().unwrap_or_default().to_owned()),
    })
}

/// Parses a full argument vector, program name first.
pub fn parse_matmul<I, T>(args: I) -> Result<MatmulConfig, ArgError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    parse::<MatmulArgs, _, _>(args, 2)?.try_into()
}

/// Parses a full argument vector, program name first.
pub fn parse_sum<I, T>(args: I) -> Result<SumConfig, ArgError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    parse::<SumArgs, _, _>(args, 2)?.try_into()
}
