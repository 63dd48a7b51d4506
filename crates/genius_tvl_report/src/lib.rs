//! Static HTML report generation from a TVL/staking snapshot bundle.

use genius_tvl::{Balances, ReportData};
use std::io::Write;
use std::path::Path;

/// Render a static HTML report to `out_path`. Embeds the full bundle JSON for verification.
pub fn render_report(data: &ReportData, out_path: impl AsRef<Path>) -> Result<(), ReportError> {
    let html = build_html(data)?;
    let mut f = std::fs::File::create(out_path.as_ref()).map_err(ReportError::Io)?;
    f.write_all(html.as_bytes()).map_err(ReportError::Io)?;
    Ok(())
}

/// Build HTML string from report data (for testing or in-memory use).
pub fn build_html(data: &ReportData) -> Result<String, ReportError> {
    let json_embed = serde_json::to_string(&data.bundle).map_err(ReportError::Json)?;
    let bundle = &data.bundle;

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8"/>
<meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>Genius TVL – {chain}</title>
<style>
:root {{ font-family: system-ui, sans-serif; background: #0f1419; color: #e6edf3; }}
body {{ max-width: 720px; margin: 0 auto; padding: 1.5rem; }}
h1 {{ font-size: 1.4rem; margin-bottom: 0.5rem; }}
h2 {{ font-size: 1.1rem; margin-top: 1.5rem; color: #8b949e; }}
.mono {{ font-family: ui-monospace, monospace; font-size: 0.9em; word-break: break-all; }}
.card {{ background: #161b22; border: 1px solid #30363d; border-radius: 6px; padding: 1rem; margin: 0.5rem 0; }}
.grid {{ display: grid; grid-template-columns: auto 1fr; gap: 0.25rem 1rem; }}
.label {{ color: #8b949e; }}
.footer {{ margin-top: 2rem; font-size: 0.85rem; color: #8b949e; }}
</style>
</head>
<body>
<h1>Genius TVL Snapshot</h1>
<p>Chain: <strong>{chain}</strong></p>
<p>Generated: {created}</p>

<h2>TVL (stability pool collateral + native)</h2>
<div class="card">
  <div class="grid">
{tvl_rows}
  </div>
</div>

<h2>Staking (Basic + Advanced miners + settled GENI, base units)</h2>
<div class="card">
  <div class="grid">
{staking_rows}
  </div>
</div>

<h2>Contracts</h2>
<div class="card">
  <div class="grid">
    <span class="label">Genius staking</span><span class="mono">{genius}</span>
    <span class="label">Stability pool</span><span class="mono">{pool}</span>
    <span class="label">RPC requests</span><span>{requests}</span>
  </div>
</div>

<h2>Reproducibility</h2>
<div class="card">
  <div class="mono">SHA-256: {hash}</div>
  <p class="footer">Re-run <code>genius-tvl verify --bundle &lt;file&gt;</code> to check the hash.</p>
</div>

<h2>Snapshot bundle (embedded)</h2>
<div class="card">
  <script type="application/json" id="snapshot-bundle">{json_embed}</script>
</div>

<div class="footer">
  <p>Read-only report; no signing.</p>
</div>
</body>
</html>"#,
        chain = escape_html(&bundle.chain),
        created = escape_html(&bundle.created_utc_rfc3339),
        tvl_rows = balance_rows(&bundle.tvl),
        staking_rows = balance_rows(&bundle.staking),
        genius = escape_html(&bundle.genius_contract),
        pool = escape_html(&bundle.stability_pool),
        requests = bundle.request_count,
        hash = escape_html(&data.reproducibility_hash_sha256),
        json_embed = escape_html(&json_embed),
    );
    Ok(html)
}

fn balance_rows(balances: &Balances) -> String {
    if balances.is_empty() {
        return r#"    <span class="label">—</span><span>0</span>"#.to_string();
    }
    balances
        .iter()
        .map(|(addr, amount)| {
            format!(
                r#"    <span class="label mono">{}</span><span class="mono">{}</span>"#,
                escape_html(addr),
                amount
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug)]
pub enum ReportError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Io(e) => write!(f, "io: {}", e),
            ReportError::Json(e) => write!(f, "json: {}", e),
        }
    }
}

impl std::error::Error for ReportError {}
