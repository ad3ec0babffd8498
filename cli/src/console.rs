use owo_colors::OwoColorize;

use conformance::{ConformanceError, Reporter};

/// Human-readable progress markers on stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn suite_started(&self) {
        if !self.quiet {
            println!("\n{}  Running adapter tests\n", "[start]".bright_blue().bold());
        }
    }

    fn scenario_started(&self, scenario: &'static str) {
        if !self.quiet {
            println!("{} {scenario}", "►".bright_blue().bold());
        }
    }

    fn scenario_passed(&self, _scenario: &'static str) {
        if !self.quiet {
            println!("  {}\n", "✓ Passed".green());
        }
    }

    fn scenario_failed(&self, scenario: &'static str, error: &ConformanceError) {
        if self.quiet {
            println!("{} {scenario}", "✗".red().bold());
        } else {
            println!("  {}\n", "✗ Failed".red());
        }
        println!("  {}", error.to_string().dimmed());
    }

    fn suite_passed(&self) {
        println!("\n{}  Adapter passed all tests\n", "[success]".green().bold());
    }
}
