//! Console reporter with colored output

use crate::analyzer::scoring::{ScoreCalculator, STRENGTH_THRESHOLD, WEAKNESS_THRESHOLD};
use crate::batch::{AggregateStats, BatchEntry};
use crate::history::ProgressReport;
use crate::{AlignmentStrength, DocumentReport, Grade, Priority, QueryAlignment};
use colored::Colorize;
use std::path::Path;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single scored document
    pub fn report(&self, doc: &DocumentReport) {
        self.print_header(doc);
        self.print_score(doc);
        self.print_breakdown(doc);
        self.print_strengths_and_weaknesses(doc);
        if let Some(ref alignment) = doc.analysis.query_alignment {
            self.print_alignment(alignment);
        }
        self.print_recommendations(doc);
        println!();
    }

    /// Report multiple documents with summary
    pub fn report_many(&self, docs: &[DocumentReport], stats: &AggregateStats) {
        for doc in docs {
            self.report(doc);
            println!("{}", "─".repeat(60));
        }
        self.print_summary(stats);
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, doc: &DocumentReport) {
        println!(
            "{}: {:.1} ({})",
            doc.path.display(),
            doc.analysis.overall_score,
            self.colorize_grade(&doc.analysis.grade)
        );
    }

    /// Report a batch run: one line per item, then the summary
    pub fn report_batch(&self, entries: &[BatchEntry], stats: &AggregateStats) {
        println!();
        println!("{}", "📦 Batch Analysis".bold());
        for entry in entries {
            let label = entry
                .id
                .clone()
                .unwrap_or_else(|| format!("#{}", entry.index + 1));
            match (&entry.result, &entry.error) {
                (Some(result), _) => println!(
                    "   {} {} {:.1} ({})",
                    "✓".green(),
                    label,
                    result.overall_score,
                    self.colorize_grade(&result.grade)
                ),
                (None, Some(error)) => {
                    println!("   {} {} {}", "✗".red(), label, error.dimmed())
                }
                (None, None) => {}
            }
        }
        self.print_summary(stats);
    }

    /// Report a before/after comparison
    pub fn report_progress(&self, before: &Path, after: &Path, progress: &ProgressReport) {
        println!();
        println!(
            "{}",
            format!("📈 Progress: {} → {}", before.display(), after.display()).bold()
        );

        let delta = format!("{:+.1}", progress.overall_delta);
        let delta = if progress.overall_delta > 0.0 {
            delta.green()
        } else if progress.overall_delta < 0.0 {
            delta.red()
        } else {
            delta.dimmed()
        };
        println!(
            "   Overall: {:.1} ({}) → {:.1} ({})  {}",
            progress.overall_before,
            self.colorize_grade(&progress.grade_before),
            progress.overall_after,
            self.colorize_grade(&progress.grade_after),
            delta.bold()
        );
        println!();

        for d in &progress.dimension_deltas {
            let change = format!("{:+.1}", d.delta);
            let change = if d.delta > 0.0 {
                change.green()
            } else if d.delta < 0.0 {
                change.red()
            } else {
                change.dimmed()
            };
            println!(
                "   {:<15} {:>5.1} → {:>5.1}  {}",
                d.dimension.label(),
                d.before,
                d.after,
                change
            );
        }

        if !progress.resolved_weaknesses.is_empty() {
            println!();
            println!("   {}", "Resolved weaknesses:".bold());
            for dim in &progress.resolved_weaknesses {
                println!("   {} {}", "✓".green(), dim.label());
            }
        }
        if !progress.new_weaknesses.is_empty() {
            println!();
            println!("   {}", "New weaknesses:".bold());
            for dim in &progress.new_weaknesses {
                println!("   {} {}", "⚠".yellow(), dim.label());
            }
        }
        println!();
    }

    fn print_header(&self, doc: &DocumentReport) {
        let meta = &doc.analysis.metadata;
        println!();
        println!(
            "{}",
            format!("📊 AEO Content Analysis: {}", doc.path.display()).bold()
        );
        println!(
            "   Type: {} | Words: {} | Target queries: {}",
            meta.content_type, doc.analysis.word_count, meta.target_queries_count
        );
        if let Some(ref url) = meta.content_url {
            println!("   URL: {}", url);
        }
        println!();
    }

    fn print_score(&self, doc: &DocumentReport) {
        let grade_str = self.colorize_grade(&doc.analysis.grade);
        let score_bar = self.create_score_bar(doc.analysis.overall_score);

        println!("   Score: {} {}", score_bar, grade_str.bold());
        println!(
            "   {}",
            ScoreCalculator::grade_description(doc.analysis.grade).dimmed()
        );
        println!();
    }

    fn print_breakdown(&self, doc: &DocumentReport) {
        println!("   {}", "Score Breakdown:".bold());
        for (dim, component) in doc.analysis.component_scores.iter() {
            let bar = create_mini_bar(component.score);
            let score_str = format!("{:>5.1}", component.score);
            let colored_score = if component.score >= STRENGTH_THRESHOLD {
                score_str.green()
            } else if component.score >= WEAKNESS_THRESHOLD {
                score_str.yellow()
            } else {
                score_str.red()
            };
            println!(
                "   {} {} {} (weight {}%)",
                bar,
                colored_score,
                dim.label(),
                dim.weight_percent()
            );
            if self.verbose {
                println!("       {} {}", "↳".dimmed(), component.details.dimmed());
            }
        }
        println!();
    }

    fn print_strengths_and_weaknesses(&self, doc: &DocumentReport) {
        if !doc.analysis.strengths.is_empty() {
            println!("   {}", "Strengths:".bold());
            for s in &doc.analysis.strengths {
                println!("   {} {}", "✓".green(), s);
            }
            println!();
        }
        if !doc.analysis.weaknesses.is_empty() {
            println!("   {}", "Weaknesses:".bold());
            for w in &doc.analysis.weaknesses {
                println!("   {} {}", "✗".red(), w);
            }
            println!();
        }
    }

    fn print_alignment(&self, alignment: &[QueryAlignment]) {
        println!("   {}", "Query Alignment:".bold());
        for qa in alignment {
            let label = qa.alignment.to_string();
            let label = match qa.alignment {
                AlignmentStrength::Strong => label.green().bold(),
                AlignmentStrength::Good => label.green(),
                AlignmentStrength::Partial => label.yellow(),
                AlignmentStrength::Weak => label.red(),
            };
            println!(
                "   {:<8} {} ({:.0}% of words)",
                label,
                qa.query,
                qa.match_ratio * 100.0
            );
            if self.verbose && !qa.matched_words.is_empty() {
                println!(
                    "       {} matched: {}",
                    "↳".dimmed(),
                    qa.matched_words.join(", ").dimmed()
                );
            }
        }
        println!();
    }

    fn print_recommendations(&self, doc: &DocumentReport) {
        let recs = &doc.analysis.recommendations;
        if recs.is_empty() {
            return;
        }
        println!("   {}", "Recommendations:".bold());
        let shown = if self.verbose { recs.len() } else { 3 };
        for rec in recs.iter().take(shown) {
            let priority = match rec.priority {
                Priority::High => "high".red(),
                Priority::Medium => "medium".yellow(),
            };
            println!(
                "   {} [{}] {}: {}",
                "→".cyan(),
                priority,
                rec.area.label(),
                rec.action
            );
        }
        if recs.len() > shown {
            println!(
                "   {} {} more (use --verbose to show)",
                "ℹ".blue(),
                recs.len() - shown
            );
        }
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!(
            "   Items analyzed: {}",
            stats.items_analyzed.to_string().bold()
        );
        if stats.failed > 0 {
            println!("   Failed:         {}", stats.failed.to_string().red());
        }
        println!(
            "   Average score:  {} ({})",
            format!("{:.1}", stats.average_score).bold(),
            self.colorize_grade(&stats.average_grade)
        );
        let distribution: Vec<String> = stats
            .grade_distribution
            .iter()
            .map(|(grade, count)| format!("{}: {}", grade, count))
            .collect();
        println!("   Grades:         {}", distribution.join("  "));
        println!();
    }

    fn colorize_grade(&self, grade: &Grade) -> colored::ColoredString {
        let s = grade.to_string();
        if !self.use_colors {
            return s.normal();
        }
        match grade {
            Grade::A => s.green().bold(),
            Grade::B => s.green(),
            Grade::C => s.yellow(),
            Grade::D => s.red(),
            Grade::F => s.red().bold(),
        }
    }

    fn create_score_bar(&self, score: f64) -> String {
        let bar = score_bar(score);
        if self.use_colors {
            if score >= 80.0 {
                bar.green().to_string()
            } else if score >= 50.0 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// 20-cell bar followed by the score, e.g. `[██████████░░░░░░░░░░]  50.0`
fn score_bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 5.0).floor() as usize).min(20);
    format!(
        "[{}{}] {:>5.1}",
        "█".repeat(filled),
        "░".repeat(20 - filled),
        score
    )
}

/// 10-cell bar for a 0-100 component score
fn create_mini_bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 10.0).floor() as usize).min(10);
    format!("[{}{}]", "▓".repeat(filled), "░".repeat(10 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bar_fill() {
        assert_eq!(score_bar(0.0), format!("[{}]   0.0", "░".repeat(20)));
        assert_eq!(score_bar(100.0), format!("[{}] 100.0", "█".repeat(20)));
        assert_eq!(
            score_bar(52.4),
            format!("[{}{}]  52.4", "█".repeat(10), "░".repeat(10))
        );
    }

    #[test]
    fn test_mini_bar_fill() {
        assert_eq!(create_mini_bar(0.0), format!("[{}]", "░".repeat(10)));
        assert_eq!(create_mini_bar(79.9), format!("[{}{}]", "▓".repeat(7), "░".repeat(3)));
        assert_eq!(create_mini_bar(100.0), format!("[{}]", "▓".repeat(10)));
    }

    #[test]
    fn test_uncolored_grade_is_plain() {
        let reporter = ConsoleReporter::new().without_colors();
        assert_eq!(reporter.colorize_grade(&Grade::B).to_string(), "B");
        assert_eq!(reporter.create_score_bar(90.0), score_bar(90.0));
    }
}
