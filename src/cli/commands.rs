// CLI command definitions

use super::generate::GenerateCommand;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "kubegen",
    version,
    about = "Kubernetes artifact generator for annotated services",
    long_about = "Turns deployment annotations into Kubernetes, Istio and OpenShift YAML, \
                  a Dockerfile and an optional container image"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate deployment artifacts for a compiled program
    Generate(GenerateCommand),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let args = CliArgs::try_parse_from([
            "kubegen",
            "generate",
            "--input",
            "hello.toml",
            "--artifact",
            "target/hello.balx",
            "-D",
            "env=prod",
        ])
        .unwrap();

        let Commands::Generate(cmd) = args.command;
        assert_eq!(cmd.input.to_str(), Some("hello.toml"));
        assert_eq!(cmd.properties, vec!["env=prod".to_string()]);
        assert!(cmd.output.is_none());
    }
}
