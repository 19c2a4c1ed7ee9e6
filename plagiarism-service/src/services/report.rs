use crate::models::CheckResult;

pub const REPORT_FILE_NAME: &str = "plagiarism_report.txt";

/// Plain-text report offered as a download after a check.
pub fn render_report(result: &CheckResult) -> String {
    let sections = result
        .flagged_sections
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. \"{}\" - {}% similar", i + 1, s.text, s.similarity))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Plagiarism Report\n\
         -----------------\n\
         Overall Similarity: {}%\n\
         \n\
         Flagged Sections:\n\
         {}\n",
        result.similarity, sections
    )
}
