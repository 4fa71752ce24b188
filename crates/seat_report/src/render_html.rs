// crates/seat_report/src/render_html.rs
//
// Deterministic, offline HTML renderer. No external assets, no scripts.
// Every piece of document text goes through `esc`; integers get a narrow
// no-break space (U+202F) as thousands separator.
//
// Section order: Cover → Totals → Seats → Quota | Threshold | Districts →
// Warnings → Integrity.

use std::fmt::Write as _;

use crate::{ReportModel, SectionDistricts, SectionQuota, SectionThreshold};

// ------------------------- i18n phrasebook -------------------------

#[derive(Copy, Clone)]
struct Phrase {
    key: &'static str,
    en: &'static str,
    fr: &'static str,
}

const PHRASES: &[Phrase] = &[
    Phrase { key: "method",      en: "Method",               fr: "Méthode" },
    Phrase { key: "totals",      en: "Totals",               fr: "Totaux" },
    Phrase { key: "votes",       en: "Votes",                fr: "Voix" },
    Phrase { key: "seats",       en: "Seats",                fr: "Sièges" },
    Phrase { key: "contestants", en: "Contestants",          fr: "Listes" },
    Phrase { key: "party",       en: "Party",                fr: "Parti" },
    Phrase { key: "alliance",    en: "Alliance",             fr: "Alliance" },
    Phrase { key: "vote_share",  en: "Vote share",           fr: "Part des voix" },
    Phrase { key: "seat_share",  en: "Seat share",           fr: "Part des sièges" },
    Phrase { key: "tie_note",    en: "The last seat was settled by the tie rule.",
                                 fr: "Le dernier siège a été attribué par la règle d’égalité." },
    Phrase { key: "quota",       en: "Quota seats",          fr: "Sièges de quota" },
    Phrase { key: "quota_party", en: "Plurality party",      fr: "Parti arrivé en tête" },
    Phrase { key: "dhondt",      en: "D'Hondt seats",        fr: "Sièges D'Hondt" },
    Phrase { key: "threshold",   en: "Threshold",            fr: "Seuil" },
    Phrase { key: "min_votes",   en: "Votes needed",         fr: "Voix requises" },
    Phrase { key: "bloc",        en: "First stage",          fr: "Premier tour de répartition" },
    Phrase { key: "qualified",   en: "Qualified",            fr: "Qualifié" },
    Phrase { key: "excluded",    en: "Excluded parties",     fr: "Partis exclus" },
    Phrase { key: "districts",   en: "Districts",            fr: "Circonscriptions" },
    Phrase { key: "district",    en: "District",             fr: "Circonscription" },
    Phrase { key: "winners",     en: "Seats won",            fr: "Sièges obtenus" },
    Phrase { key: "skipped",     en: "Not allocated",        fr: "Non attribuées" },
    Phrase { key: "warnings",    en: "Warnings",             fr: "Avertissements" },
    Phrase { key: "integrity",   en: "Integrity",            fr: "Intégrité" },
    Phrase { key: "result_id",   en: "Result id",            fr: "Identifiant du résultat" },
    Phrase { key: "engine",      en: "Engine",               fr: "Moteur" },
    Phrase { key: "tie_policy",  en: "Tie policy",           fr: "Règle d’égalité" },
    Phrase { key: "input",       en: "Input SHA-256",        fr: "SHA-256 de l’entrée" },
    Phrase { key: "yes",         en: "yes",                  fr: "oui" },
    Phrase { key: "no",          en: "no",                   fr: "non" },
];

fn t(lang: &str, key: &str) -> &'static str {
    let fr = matches!(lang, "fr" | "fr-FR" | "fr-CA" | "fr_CA" | "fr-BE" | "fr-CH");
    match PHRASES.iter().find(|p| p.key == key) {
        Some(p) if fr => p.fr,
        Some(p) => p.en,
        None => "",
    }
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

/// Non-negative integer with U+202F between groups of three digits.
fn fmt_int<T: Into<u128>>(n: T) -> String {
    let digits = n.into().to_string();
    let mut out = String::with_capacity(digits.len() * 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\u{202F}');
        }
        out.push(ch);
    }
    out
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

    fn yes(&self, b: bool) -> &'static str {
        t(self.lang, if b { "yes" } else { "no" })
    }

    /// Start document with minimal inline style.
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
             table{{border-collapse:collapse;margin:8px 0}}\
             td,th{{padding:4px 8px;border-bottom:1px solid #ddd;text-align:left}}\
             td.n{{text-align:right;font-variant-numeric:tabular-nums}}\
             </style></head><body>",
            esc(self.lang),
            esc(title)
        );
    }

    pub fn finish(mut self) -> String {
        self.buf.push_str("</body></html>\n");
        self.buf
    }

    pub fn section_cover(&mut self, title: &str, method_label: &str) {
        let _ = write!(
            self.buf,
            "<h1>{}</h1><p class=\"muted\"><b>{}:</b> {}</p>",
            esc(title),
            esc(t(self.lang, "method")),
            esc(method_label)
        );
    }

    pub fn section_totals(&mut self, votes: u64, seats: u32, contestants: usize, tie: bool) {
        let _ = write!(
            self.buf,
            "<h3>{}</h3><p>{}: {}<br>{}: {}<br>{}: {}</p>",
            esc(t(self.lang, "totals")),
            esc(t(self.lang, "votes")), fmt_int(votes),
            esc(t(self.lang, "seats")), fmt_int(seats),
            esc(t(self.lang, "contestants")), fmt_int(contestants as u64),
        );
        if tie {
            let _ = write!(self.buf, "<p class=\"note\">{}</p>", esc(t(self.lang, "tie_note")));
        }
    }

    pub fn section_seats(&mut self, model: &ReportModel) {
        let with_alliance = model.rows.iter().any(|r| r.alliance.is_some());
        let _ = write!(self.buf, "<h3>{}</h3><table><thead><tr><th>{}</th>",
            esc(t(self.lang, "seats")), esc(t(self.lang, "party")));
        if with_alliance {
            let _ = write!(self.buf, "<th>{}</th>", esc(t(self.lang, "alliance")));
        }
        let _ = write!(
            self.buf,
            "<th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr></thead><tbody>",
            esc(t(self.lang, "votes")),
            esc(t(self.lang, "vote_share")),
            esc(t(self.lang, "seats")),
            esc(t(self.lang, "seat_share")),
        );
        for r in &model.rows {
            let _ = write!(self.buf, "<tr><td>{}</td>", esc(&r.name));
            if with_alliance {
                let _ = write!(self.buf, "<td>{}</td>", esc(r.alliance.as_deref().unwrap_or("")));
            }
            let _ = write!(
                self.buf,
                "<td class=\"n\">{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td></tr>",
                fmt_int(r.votes),
                esc(&r.vote_share),
                fmt_int(r.seats),
                esc(&r.seat_share),
            );
        }
        self.buf.push_str("</tbody></table>");
    }

    pub fn section_quota(&mut self, q: &SectionQuota) {
        let _ = write!(
            self.buf,
            "<h3>{}</h3><p>{}: {} ({} {})<br>{}: {}<br>{}: {}</p>",
            esc(t(self.lang, "quota")),
            esc(t(self.lang, "quota_party")),
            esc(q.party.as_deref().unwrap_or("–")),
            fmt_int(q.party_votes),
            esc(&t(self.lang, "votes").to_lowercase()),
            esc(t(self.lang, "quota")), fmt_int(q.quota_seats),
            esc(t(self.lang, "dhondt")), fmt_int(q.dhondt_seats),
        );
        if q.tie {
            let _ = write!(self.buf, "<p class=\"note\">{}</p>", esc(t(self.lang, "tie_note")));
        }
    }

    pub fn section_threshold(&mut self, th: &SectionThreshold) {
        let _ = write!(
            self.buf,
            "<h3>{}</h3><p>{}: {}<br>{}: {}</p>",
            esc(t(self.lang, "threshold")),
            esc(t(self.lang, "threshold")), esc(&th.threshold),
            esc(t(self.lang, "min_votes")), fmt_int(th.min_votes),
        );
        let _ = write!(
            self.buf,
            "<table><caption>{}</caption><thead><tr><th></th><th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr></thead><tbody>",
            esc(t(self.lang, "bloc")),
            esc(t(self.lang, "votes")),
            esc(t(self.lang, "vote_share")),
            esc(t(self.lang, "qualified")),
            esc(t(self.lang, "seats")),
        );
        for b in &th.blocs {
            let qualified = self.yes(b.qualified);
            let _ = write!(
                self.buf,
                "<tr><td>{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td><td>{}</td><td class=\"n\">{}</td></tr>",
                esc(&b.name),
                fmt_int(b.votes),
                esc(&b.vote_share),
                esc(qualified),
                fmt_int(b.seats),
            );
        }
        self.buf.push_str("</tbody></table>");
        if !th.excluded_parties.is_empty() {
            let list: Vec<String> = th.excluded_parties.iter().map(|p| esc(p)).collect();
            let _ = write!(self.buf, "<p><b>{}:</b> {}</p>", esc(t(self.lang, "excluded")), list.join(", "));
        }
        if let Some(note) = &th.note {
            let _ = write!(self.buf, "<p class=\"note\">{}</p>", esc(note));
        }
    }

    pub fn section_districts(&mut self, d: &SectionDistricts) {
        let _ = write!(
            self.buf,
            "<h3>{}</h3><table><thead><tr><th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr></thead><tbody>",
            esc(t(self.lang, "districts")),
            esc(t(self.lang, "district")),
            esc(t(self.lang, "seats")),
            esc(t(self.lang, "votes")),
            esc(t(self.lang, "winners")),
        );
        for r in &d.rows {
            let _ = write!(
                self.buf,
                "<tr><td>{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td><td>{}{}</td></tr>",
                esc(&r.name),
                fmt_int(r.seats),
                fmt_int(r.votes),
                esc(&r.winners),
                if r.last_seat_tie { " *" } else { "" },
            );
        }
        self.buf.push_str("</tbody></table>");
        if !d.skipped.is_empty() {
            let list: Vec<String> = d.skipped.iter().map(|s| esc(s)).collect();
            let _ = write!(self.buf, "<p class=\"muted\"><b>{}:</b> {}</p>", esc(t(self.lang, "skipped")), list.join(", "));
        }
    }

    pub fn section_warnings(&mut self, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        let _ = write!(self.buf, "<h3>{}</h3><ul>", esc(t(self.lang, "warnings")));
        for w in warnings {
            let _ = write!(self.buf, "<li>{}</li>", esc(w));
        }
        self.buf.push_str("</ul>");
    }

    pub fn section_integrity(&mut self, model: &ReportModel) {
        let i = &model.integrity;
        let _ = write!(
            self.buf,
            "<h3>{}</h3><p class=\"muted\">{}: <code>{}</code><br>{}: {} {}<br>{}: {}",
            esc(t(self.lang, "integrity")),
            esc(t(self.lang, "result_id")), esc(i.result_id.as_str()),
            esc(t(self.lang, "engine")), esc(&i.engine_name), esc(&i.engine_version),
            esc(t(self.lang, "tie_policy")), esc(&i.tie_policy),
        );
        if let Some(seed) = &i.tie_seed {
            let _ = write!(self.buf, " (seed <code>{}</code>)", esc(seed));
        }
        if let Some(sha) = &i.input_sha256 {
            let _ = write!(self.buf, "<br>{}: <code>{}</code>", esc(t(self.lang, "input")), esc(sha));
        }
        self.buf.push_str("</p>");
    }
}

// ------------------------- entry point -------------------------

/// Render the whole report as one self-contained HTML page.
/// Unknown `lang` tags fall back to English phrases.
pub fn render_html(model: &ReportModel, lang: &str) -> String {
    let mut h = HtmlBuilder::new(lang);
    h.start(&model.cover.title);
    h.section_cover(&model.cover.title, &model.cover.method_label);
    h.section_totals(
        model.totals.votes,
        model.totals.seats,
        model.totals.contestants,
        model.totals.last_seat_tie,
    );
    h.section_seats(model);
    if let Some(q) = &model.quota {
        h.section_quota(q);
    }
    if let Some(th) = &model.threshold {
        h.section_threshold(th);
    }
    if let Some(d) = &model.districts {
        h.section_districts(d);
    }
    h.section_warnings(&model.warnings);
    h.section_integrity(model);
    h.finish()
}
