use console::style;

/// Colored status-line printer. Passed explicitly to the routines that
/// produce user-facing output; tracing stays for diagnostics.
#[derive(Debug, Default)]
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    pub fn info(&self, msg: &str) {
        println!("{} {msg}", style("→").blue());
    }

    pub fn success(&self, msg: &str) {
        println!("{} {msg}", style("✓").green());
    }

    pub fn warning(&self, msg: &str) {
        println!("{} {msg}", style("⚠").yellow());
    }

    /// Yellow phase announcement, no glyph.
    pub fn phase(&self, msg: &str) {
        println!("{}", style(msg).yellow());
    }

    pub fn error(&self, msg: &str) {
        println!("{} {msg}", style("✗").red());
    }

    pub fn header(&self, msg: &str) {
        println!("{}", style(format!("=== {msg} ===")).green().bold());
    }

    pub fn error_header(&self, msg: &str) {
        println!("{}", style(format!("=== {msg} ===")).red().bold());
    }

    pub fn plain(&self, msg: &str) {
        println!("{msg}");
    }

    pub fn blank(&self) {
        println!();
    }
}

/// A run succeeded only when no migration failed and no expected table
/// is missing.
pub fn is_success(failed_migrations: &[String], missing_tables: &[String]) -> bool {
    failed_migrations.is_empty() && missing_tables.is_empty()
}

/// Final run summary. Claims success only when both lists are empty.
pub fn print_summary(reporter: &Reporter, failed_migrations: &[String], missing_tables: &[String]) {
    reporter.blank();

    if is_success(failed_migrations, missing_tables) {
        reporter.header("Database setup completed successfully!");
        reporter.blank();
        reporter.plain("You can now:");
        reporter.plain("  1. Register new users at http://localhost:3000/login");
        reporter.plain("  2. Create and manage articles");
        reporter.plain("  3. Track user activity");
        return;
    }

    reporter.error_header("Setup completed with errors");
    reporter.blank();

    if !failed_migrations.is_empty() {
        reporter.plain(&format!("Failed migrations: {}", failed_migrations.join(", ")));
        reporter.plain("Please check the errors above and fix them.");
    }
    if !missing_tables.is_empty() {
        reporter.plain(&format!("Missing tables: {}", missing_tables.join(", ")));
        reporter.plain("You may need to run the failed migrations manually.");
    }

    reporter.blank();
    reporter.plain("You can run migrations manually in the Supabase SQL Editor.");
}
