// crates/wm_report/src/render_html.rs
//
// Deterministic, offline HTML renderer with a small de/en phrasebook.
// Section order: Header → Chart (or placeholder) → Legend → Note → Procedures → Integrity.
// All user/content fields are HTML-escaped; no external assets.

use std::fmt::Write as _;

use wm_core::rounding::{format_tenths, percent_one_decimal_tenths};

use crate::{LegendLine, PartyLine, ReportModel};

// ------------------------- i18n phrasebook -------------------------

#[derive(Copy, Clone)]
struct Phrase {
    key: &'static str,
    de: &'static str,
    en: &'static str,
}

const PHRASES: &[Phrase] = &[
    Phrase { key: "title_report", de: "Wahl-O-Meter",                  en: "Vote-O-Meter" },
    Phrase { key: "fractions",    de: "Fraktionen",                    en: "Parliamentary groups" },
    Phrase { key: "voted_of",     de: "abgestimmte Vorgänge von",      en: "voted procedures out of" },
    Phrase { key: "no_votes",     de: "Sie haben noch keine Abstimmung abgegeben. Stimmen Sie ab, um Ihre Übereinstimmung mit den Fraktionen zu sehen.",
                                  en: "You have not voted yet. Vote on procedures to see how you match the parliamentary groups." },
    Phrase { key: "overall",      de: "Gesamtübereinstimmung",         en: "Overall agreement" },
    Phrase { key: "procedures",   de: "Abstimmungen",                  en: "Votes" },
    Phrase { key: "integrity",    de: "Integrität",                    en: "Integrity" },
    Phrase { key: "skipped",      de: "Übersprungen",                  en: "Skipped" },
];

fn t(lang: &str, key: &str) -> &'static str {
    let de = matches!(lang, "de" | "de-DE" | "de_DE" | "de-AT" | "de-CH");
    PHRASES
        .iter()
        .find(|p| p.key == key)
        .map(|p| if de { p.de } else { p.en })
        .unwrap_or("")
}

// ------------------------- formatting helpers -------------------------

/// Escape text for HTML (minimal, deterministic).
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Bar widths in tenths of a percent; always sum to 1000 for a non-empty row.
fn bar_tenths(matches: u64, diffs: u64) -> (u32, u32) {
    match percent_one_decimal_tenths(matches, matches + diffs) {
        Some(m) => (m, 1000 - m),
        None => (0, 0),
    }
}

// ------------------------- HTML builder -------------------------

pub struct HtmlBuilder<'a> {
    lang: &'a str,
    buf: String,
}

impl<'a> HtmlBuilder<'a> {
    pub fn new(lang: &'a str) -> Self {
        Self { lang, buf: String::with_capacity(16 * 1024) }
    }

    /// Start document with minimal head. Deterministic, asset-free.
    pub fn start(&mut self, title: &str) {
        let _ = write!(
            self.buf,
            "<!doctype html><html lang=\"{}\"><head><meta charset=\"utf-8\">\
             <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
             <title>{}</title>\
             <style>\
             body{{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,Arial,sans-serif;margin:24px;}}\
             h1,h2,h3{{margin:0.2em 0;}}\
             .muted{{opacity:0.8}}\
             .note{{font-style:italic;opacity:0.9}}\
             .bar{{display:flex;height:14px;width:100%;background:#eee}}\
             .row{{margin:6px 0}}\
             .row.sel{{font-weight:bold}}\
             .sw{{display:inline-block;width:10px;height:10px;margin-right:4px}}\
             table{{border-collapse:collapse}}\
             td,th{{padding:4px 8px;border-bottom:1px solid #ddd;text-align:left}}\
             </style></head><body>",
            esc(self.lang),
            esc(title)
        );
    }

    /// Close document.
    pub fn finish(mut self) -> String {
        self.buf.push_str("</body></html>");
        self.buf
    }

    /// Header: title plus "N voted procedures out of M".
    pub fn section_header(&mut self, voted: u64, total: u64) {
        let _ = write!(
            self.buf,
            "<h1>{}</h1><h2>{}</h2><p class=\"muted\">{} {} {}</p>",
            esc(t(self.lang, "title_report")),
            esc(t(self.lang, "fractions")),
            voted,
            esc(t(self.lang, "voted_of")),
            total
        );
    }

    /// Shown instead of the chart when nothing was voted on.
    pub fn section_placeholder(&mut self) {
        let _ = write!(self.buf, "<p class=\"note\">{}</p>", esc(t(self.lang, "no_votes")));
    }

    /// One stacked bar per party, in ranked order.
    pub fn section_chart(
        &mut self,
        parties: &[PartyLine],
        selected: Option<usize>,
        matches_color: &str,
        diffs_color: &str,
    ) {
        self.buf.push_str("<div class=\"chart\">");
        for (i, p) in parties.iter().enumerate() {
            let (mw, dw) = bar_tenths(p.matches, p.diffs);
            let class = if selected == Some(i) { "row sel" } else { "row" };
            let _ = write!(
                self.buf,
                "<div class=\"{}\"><div>{} <span class=\"muted\">{}%</span></div>\
                 <div class=\"bar\"><div style=\"width:{}%;background:{}\"></div>\
                 <div style=\"width:{}%;background:{}\"></div></div></div>",
                class,
                esc(&p.party),
                esc(p.agreement_pct.as_deref().unwrap_or("-")),
                format_tenths(mw),
                esc(matches_color),
                format_tenths(dw),
                esc(diffs_color)
            );
        }
        self.buf.push_str("</div>");
    }

    pub fn section_legend(&mut self, party: &str, legend: &[LegendLine; 2]) {
        let _ = write!(self.buf, "<h3>{}</h3><ul>", esc(party));
        for l in legend {
            let _ = write!(
                self.buf,
                "<li><span class=\"sw\" style=\"background:{}\"></span>{}: <b>{}</b></li>",
                esc(&l.color),
                esc(&l.label),
                l.value
            );
        }
        self.buf.push_str("</ul>");
    }

    pub fn section_overall(&mut self, pct: &str) {
        let _ = write!(self.buf, "<p>{}: <b>{}%</b></p>", esc(t(self.lang, "overall")), esc(pct));
    }

    pub fn section_note(&mut self, note: &str) {
        let _ = write!(self.buf, "<p class=\"note\">{}</p>", esc(note));
    }

    /// Voted procedures, in input order; falls back to the id when untitled.
    pub fn section_procedures<'b, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (&'b str, Option<&'b str>)>,
    {
        let _ = write!(self.buf, "<h3>{}</h3><ul>", esc(t(self.lang, "procedures")));
        for (id, title) in items {
            let _ = write!(self.buf, "<li data-id=\"{}\">{}</li>", esc(id), esc(title.unwrap_or(id)));
        }
        self.buf.push_str("</ul>");
    }

    pub fn section_integrity(&mut self, result_id: &str, skipped: &[String]) {
        let _ = write!(
            self.buf,
            "<h3>{}</h3><p class=\"muted\"><code>{}</code></p>",
            esc(t(self.lang, "integrity")),
            esc(result_id)
        );
        if !skipped.is_empty() {
            let joined: Vec<String> = skipped.iter().map(|s| esc(s)).collect();
            let _ = write!(
                self.buf,
                "<p class=\"muted\">{}: {}</p>",
                esc(t(self.lang, "skipped")),
                joined.join(", ")
            );
        }
    }
}

// ------------------------- entry point -------------------------

/// Render the full report as a single self-contained HTML document.
pub fn render_html(model: &ReportModel, lang: &str) -> String {
    let mut h = HtmlBuilder::new(lang);
    h.start(t(lang, "title_report"));

    h.section_header(model.header.voted_procedures_count, model.header.total_procedures);

    let chart = &model.chart;
    if model.header.empty || chart.parties.is_empty() {
        h.section_placeholder();
    } else {
        h.section_chart(&chart.parties, chart.selected, &chart.matches_color, &chart.diffs_color);
        if let (Some(s), Some(legend)) = (chart.selected, chart.legend.as_ref()) {
            if let Some(p) = chart.parties.get(s) {
                h.section_legend(&p.party, legend);
            }
        }
        if let Some(pct) = chart.overall_agreement_pct.as_deref() {
            h.section_overall(pct);
        }
        h.section_note(&model.note);
    }

    h.section_procedures(
        model
            .procedures
            .iter()
            .map(|p| (p.procedure_id.as_str(), p.title.as_deref())),
    );
    h.section_integrity(&model.integrity.result_id, &model.integrity.skipped_procedures);

    h.finish()
}
