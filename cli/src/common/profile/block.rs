//! The delimited block nodekit owns inside the user's shell profile.

use chrono::Local;

/// First line of the npm → pnpm conversion block.
pub const NPM_PNPM_START_MARKER: &str = "# ========== NPM-PNPM-AUTO-CONVERT-START ==========";
/// Last line of the npm → pnpm conversion block.
pub const NPM_PNPM_END_MARKER: &str = "# ========== NPM-PNPM-AUTO-CONVERT-END ==========";

/// PowerShell functions that route `npm`/`npx` to `pnpm`/`pnpm dlx`.
const NPM_PNPM_BODY: &str = r#"# npm command mapping
function npm {
    param([Parameter(ValueFromRemainingArguments)]$args)

    if ($args.Length -eq 0) {
        Write-Host "Using pnpm" -ForegroundColor Yellow
        pnpm --help
        return
    }

    $cmd = $args[0]
    $rest = $args[1..$args.Length]

    Write-Host "npm -> pnpm auto-convert" -ForegroundColor Yellow

    switch ($cmd) {
        'install' {
            if ($rest.Length -eq 0) {
                Write-Host "   running: pnpm install" -ForegroundColor Cyan
                pnpm install
            } else {
                Write-Host "   running: pnpm add $rest" -ForegroundColor Cyan
                pnpm add @rest
            }
        }
        'i' {
            Write-Host "   running: pnpm add $rest" -ForegroundColor Cyan
            pnpm add @rest
        }
        { $_ -in 'uninstall', 'un', 'rm', 'remove' } {
            Write-Host "   running: pnpm remove $rest" -ForegroundColor Cyan
            pnpm remove @rest
        }
        { $_ -in 'update', 'up' } {
            Write-Host "   running: pnpm update $rest" -ForegroundColor Cyan
            pnpm update @rest
        }
        { $_ -in 'run', 'test', 'start' } {
            Write-Host "   running: pnpm $cmd $rest" -ForegroundColor Cyan
            pnpm $cmd @rest
        }
        default {
            Write-Host "   running: pnpm $args" -ForegroundColor Cyan
            pnpm @args
        }
    }
}

# npx command mapping
function npx {
    Write-Host "npx -> pnpm dlx auto-convert" -ForegroundColor Yellow
    Write-Host "   running: pnpm dlx $args" -ForegroundColor Cyan
    pnpm dlx @args
}

# escape hatches to the real tools
function npm-real {
    & "npm.cmd" @args
}

function npx-real {
    & "npx.cmd" @args
}

Write-Host "npm -> pnpm auto-convert enabled" -ForegroundColor Green
Write-Host "   npm commands now run through pnpm" -ForegroundColor Gray
Write-Host "   use npm-real for the real npm" -ForegroundColor Gray"#;

/// A marker-delimited block of text. The markers must each fit on one line and
/// must not occur anywhere in `body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBlock {
    pub start_marker: String,
    pub end_marker: String,
    pub body: String,
}

impl ConfigBlock {
    pub fn new(
        start_marker: impl Into<String>,
        end_marker: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            start_marker: start_marker.into(),
            end_marker: end_marker.into(),
            body: body.into(),
        }
    }

    /// The npm → pnpm conversion block, stamped with the current local time.
    pub fn npm_to_pnpm() -> Self {
        let body = format!(
            "# npm -> pnpm auto-convert configuration\n# Generated: {}\n\n{}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            NPM_PNPM_BODY
        );
        Self::new(NPM_PNPM_START_MARKER, NPM_PNPM_END_MARKER, body)
    }

    /// The block as inserted: a blank line, the start marker, the body, the end
    /// marker, and a trailing newline.
    pub fn render(&self) -> String {
        format!(
            "\n{}\n{}\n{}\n",
            self.start_marker, self.body, self.end_marker
        )
    }
}
