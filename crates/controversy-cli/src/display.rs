//! Terminal rendering of page patches.
//!
//! Lays a `DetectPatch` out as a vertical card, one section per page region,
//! skipping regions the patch leaves hidden.

use std::fmt::Write;

use controversy_core::render::{EntryRatingForm, ScoreBanner, UrlRatingForm};
use controversy_core::{DetectPatch, RatingPatch, RatingTier};

const MAX_DIAGNOSTIC_CHARS: usize = 60;

// ── Public API ──

/// Format a rendered `detect` response.
pub fn format_detect(patch: &DetectPatch, diagnostics: bool) -> String {
    let mut out = String::new();
    if let Some(err) = &patch.network_error {
        section(&mut out, "Network Error");
        field(&mut out, "error", err);
        out.push('\n');
    }
    if let Some(err) = &patch.error {
        section(&mut out, "Server Message");
        field(&mut out, "errmsg", err);
        out.push('\n');
    }
    if let Some(banner) = &patch.score {
        format_banner(&mut out, banner);
    }
    if let Some(form) = &patch.url_rating {
        format_url_rating(&mut out, form);
    }
    if let Some(form) = &patch.entry_rating {
        format_entry_rating(&mut out, form);
    }
    if diagnostics && !patch.diagnostics.is_empty() {
        section(&mut out, "Diagnostics");
        for (key, value) in &patch.diagnostics {
            field(&mut out, key, &truncate(&value.to_string()));
        }
        out.push('\n');
    }
    out
}

/// Format the outcome of a rating submission.
pub fn format_rating(patch: &RatingPatch) -> String {
    let mut out = String::new();
    let region = patch.target.region();
    if let Some(status) = patch.status {
        let _ = writeln!(out, "[{region}] {status}");
    }
    if let Some(err) = &patch.error {
        let _ = writeln!(out, "[{region}] error: {err}");
    }
    if let Some(err) = &patch.network_error {
        let _ = writeln!(out, "[{region}] network error: {err}");
    }
    out
}

// ── Section rendering ──

fn format_banner(out: &mut String, banner: &ScoreBanner) {
    let _ = writeln!(out, "=== {} ===", banner.headline());
    out.push('\n');
    section(out, "Score");
    field(out, "grade", &banner.grade.to_string());
    field(out, "controversy", &format!("{:.4}", banner.score));
    field(out, "icon", &banner.grade.icon());
    if !banner.link.href.is_empty() {
        field(out, "url", &banner.link.href);
    }
    if let Some(text) = &banner.selected_text {
        field(out, "selected text", text);
    }
    out.push('\n');
}

fn format_url_rating(out: &mut String, form: &UrlRatingForm) {
    section(out, "Rate This");
    let _ = writeln!(out, "  {}", form.instruction);
    field(out, "request id", form.request_id.as_str());
    let scale: Vec<String> = RatingTier::all()
        .map(|tier| {
            if Some(tier) == form.preselected {
                format!("[{tier}]")
            } else {
                tier.to_string()
            }
        })
        .collect();
    field(out, "rating", &scale.join(" "));
    out.push('\n');
}

fn format_entry_rating(out: &mut String, form: &EntryRatingForm) {
    section(out, &format!("Wikipedia Entries ({})", form.rows.len()));
    let _ = writeln!(out, "  {}", form.instruction);
    for row in &form.rows {
        let _ = writeln!(out, "    {:<30} {}", row.link.label, row.link.href);
        let options: Vec<String> = row
            .options
            .iter()
            .map(|o| {
                let mark = if o.checked { "x" } else { " " };
                format!("[{mark}] {} {}", o.rating, o.label)
            })
            .collect();
        let _ = writeln!(out, "      {}", options.join("  "));
    }
    out.push('\n');
}

// ── Helpers ──

fn section(out: &mut String, header: &str) {
    let _ = writeln!(out, "{header}");
}

fn field(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "  {:<26} {}", name, value);
}

fn truncate(s: &str) -> String {
    if s.chars().count() > MAX_DIAGNOSTIC_CHARS {
        let head: String = s.chars().take(MAX_DIAGNOSTIC_CHARS - 3).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}
