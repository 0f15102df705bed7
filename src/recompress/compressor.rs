//! External compressor commands.

use std::path::Path;
use std::process::Command;

use super::RecompressError;

/// One external compressor and the variant suffix it writes.
///
/// The command is expected to keep the input file and write `<input><suffix>`
/// next to it, overwriting any previous variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressor {
    pub suffix: &'static str,
    pub command: Vec<String>,
}

impl Compressor {
    fn new(suffix: &'static str, command: &[&str]) -> Self {
        Self {
            suffix,
            command: command.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the command with a shell-quoted command line, e.g. `"pigz -k11f"`.
    pub fn with_command_line(mut self, line: &str) -> Result<Self, RecompressError> {
        let command = shell_words::split(line)
            .map_err(|_| RecompressError::InvalidCommand(line.to_string()))?;
        if command.is_empty() {
            return Err(RecompressError::InvalidCommand(line.to_string()));
        }
        self.command = command;
        Ok(self)
    }

    /// Full argument vector for compressing `file`.
    pub fn command_for(&self, file: &Path) -> Vec<String> {
        let mut argv = self.command.clone();
        argv.push(file.to_string_lossy().into_owned());
        argv
    }

    /// Run the compressor on `file`, waiting for it to finish.
    pub fn run(&self, file: &Path) -> Result<(), RecompressError> {
        let argv = self.command_for(file);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| RecompressError::InvalidCommand(String::new()))?;

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| RecompressError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(RecompressError::CommandFailed {
                command: argv,
                status,
            });
        }
        Ok(())
    }
}

/// gzip, brotli and zstd at high compression levels, keeping the original.
pub fn default_compressors() -> Vec<Compressor> {
    vec![
        Compressor::new(".gz", &["gzip", "-k9nf"]),
        Compressor::new(".br", &["brotli", "-k9nf"]),
        Compressor::new(".zst", &["zstd", "-k19f"]),
    ]
}
