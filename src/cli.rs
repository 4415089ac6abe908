use crate::error::{AppError, Result};

pub const DEFAULT_PDF_NAME: &str = "ages_average";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub verbose: bool,
    pub pdf_name: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            verbose: false,
            pdf_name: DEFAULT_PDF_NAME.to_string(),
        }
    }
}

fn usage(message: impl Into<String>) -> AppError {
    AppError::UsageError(message.into())
}

/// Parses the arguments after the program name.
///
/// Accepts nothing, or one flag group made of `v` and `n` behind a single
/// leading `-`. `n` takes the output name from the following argument.
pub fn parse_args<I, S>(args: I) -> Result<Options>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut options = Options::default();

    let (flags, file_name) = match args.as_slice() {
        [] => return Ok(options),
        [flags] => (flags, None),
        [flags, file_name] => (flags, Some(file_name)),
        _ => return Err(usage("Unexpected number of command line arguments")),
    };

    let Some(group) = flags.strip_prefix('-') else {
        return Err(usage(format!("Unknown command line argument: '{}'", flags)));
    };

    if file_name.is_some() && !group.contains('n') {
        return Err(usage("Unexpected number of command line arguments"));
    }

    for flag in group.chars() {
        match flag {
            '-' => return Err(usage("'-' character only allowed at beginning of arguments")),
            'v' => options.verbose = true,
            'n' => match file_name {
                Some(name) => options.pdf_name = name.clone(),
                None => return Err(usage("Expected filename, none found")),
            },
            other => return Err(usage(format!("Unrecognized argument: '{}'", other))),
        }
    }

    Ok(options)
}
