//! The fixed retrofit plan: canonical payloads, anchors, and token maps for
//! making the persistence module's ADODB path provider-aware.
//!
//! Payload templates are stored with bare `\n` line breaks and rendered once
//! into the target buffer's own convention, so the same canonical text works
//! against CRLF and LF modules alike.

use crate::buffer::LineEnding;
use crate::patch::rewrite::TokenMap;

/// Script-scoped references replaced by the locally resolved values.
const SCRIPT_TEXT_TYPE: &str = "$script:AdTypeVarWChar";
const SCRIPT_MEMO_TYPE: &str = "$script:AdTypeLongVarWChar";
const LOCAL_TEXT_TYPE: &str = "$textParameterType";
const LOCAL_MEMO_TYPE: &str = "$memoParameterType";

/// Helper definition resolving provider name, kind, and parameter types
/// from a live connection. Jet providers get the narrow ADO text types;
/// everything else keeps the wide defaults.
const PROVIDER_HELPER: &str = r#"function Get-InterfaceBulkProviderInfo {
    [CmdletBinding()]
    param(
        [Parameter(Mandatory=$true)][object]$Connection
    )

    if (-not (Test-IsAdodbConnection -Connection $Connection)) {
        return [PSCustomObject]@{
            Name = $null
            Kind = 'Unknown'
            TextParameterType = $script:AdTypeVarWChar
            MemoParameterType = $script:AdTypeLongVarWChar
        }
    }

    $providerName = $null
    try {
        if ($Connection.PSObject.Properties.Name -contains 'Provider') {
            $candidate = [string]$Connection.Provider
            if (-not [string]::IsNullOrWhiteSpace($candidate)) { $providerName = $candidate }
        }
    } catch { }

    if (-not $providerName) {
        try {
            if ($Connection.PSObject.Properties.Name -contains 'ConnectionString') {
                $connString = [string]$Connection.ConnectionString
                if (-not [string]::IsNullOrWhiteSpace($connString)) {
                    foreach ($segment in ($connString -split ';')) {
                        if ($segment -match '^\s*Provider\s*=\s*(.+?)\s*$') {
                            $providerName = $matches[1].Trim()
                            break
                        }
                    }
                }
            }
        } catch { }
    }

    $providerKind = 'Unknown'
    if ($providerName) {
        if ($providerName -match '(?i)ACE\.OLEDB') {
            $providerKind = 'ACE'
        } elseif ($providerName -match '(?i)Jet\.OLEDB') {
            $providerKind = 'Jet'
        }
    }

    $textType = $script:AdTypeVarWChar
    $memoType = $script:AdTypeLongVarWChar

    if ($providerKind -eq 'Jet') {
        $textType = $script:AdTypeVarChar
        $memoType = $script:AdTypeLongVarChar
    }

    return [PSCustomObject]@{
        Name = if ($providerName) { $providerName } else { $null }
        Kind = $providerKind
        TextParameterType = [int]$textType
        MemoParameterType = [int]$memoType
    }
}

"#;

/// Name/kind block the bulk-insert function shipped with.
const LEGACY_PROVIDER_BLOCK: &str = r#"    $providerName = $null
    $providerKind = 'Unknown'
    if ($providerInfo) {
        try {
            $candidateName = $providerInfo['Name']
            if (-not [string]::IsNullOrWhiteSpace($candidateName)) { $providerName = $candidateName }
        } catch { }
        try {
            $candidateKind = $providerInfo['Kind']
            if (-not [string]::IsNullOrWhiteSpace($candidateKind)) { $providerKind = $candidateKind }
        } catch { }
    }
"#;

/// Replacement block that also resolves the parameter types, falling back to
/// the script-scoped wide defaults when the provider info carries none.
const PROVIDER_BLOCK: &str = r#"    $providerName = $null
    $providerKind = 'Unknown'
    $textParameterType = $script:AdTypeVarWChar
    $memoParameterType = $script:AdTypeLongVarWChar
    if ($providerInfo) {
        try {
            $candidateName = $providerInfo.Name
            if (-not [string]::IsNullOrWhiteSpace($candidateName)) { $providerName = $candidateName }
        } catch { }
        try {
            $candidateKind = $providerInfo.Kind
            if (-not [string]::IsNullOrWhiteSpace($candidateKind)) { $providerKind = $candidateKind }
        } catch { }
        try {
            if ($providerInfo.PSObject.Properties.Name -contains 'TextParameterType') {
                $candidateTextType = $providerInfo.TextParameterType
                if ($null -ne $candidateTextType) { $textParameterType = [int]$candidateTextType }
            }
        } catch { }
        try {
            if ($providerInfo.PSObject.Properties.Name -contains 'MemoParameterType') {
                $candidateMemoType = $providerInfo.MemoParameterType
                if ($null -ne $candidateMemoType) { $memoParameterType = [int]$candidateMemoType }
            }
        } catch { }
    }
"#;

/// Preamble injected after a call site's param block: binds the local types
/// to the script defaults, then lets the helper's answer override them.
const CALL_SITE_PREAMBLE: &str = r#"    $textParameterType = $script:AdTypeVarWChar
    $memoParameterType = $script:AdTypeLongVarWChar
    $providerInfo = Get-InterfaceBulkProviderInfo -Connection $Connection
    if ($providerInfo) {
        try {
            if ($providerInfo.PSObject.Properties.Name -contains 'TextParameterType') {
                $candidateTextType = $providerInfo.TextParameterType
                if ($null -ne $candidateTextType) { $textParameterType = [int]$candidateTextType }
            }
        } catch { }
        try {
            if ($providerInfo.PSObject.Properties.Name -contains 'MemoParameterType') {
                $candidateMemoType = $providerInfo.MemoParameterType
                if ($null -ne $candidateMemoType) { $memoParameterType = [int]$candidateMemoType }
            }
        } catch { }
    }

"#;

/// ADO parameter type codes used by the retrofit.
///
/// The module declares these in script scope; the patcher treats them as
/// explicit configuration so every payload renders from one value set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCodes {
    pub var_char: i32,
    pub long_var_char: i32,
    pub var_wchar: i32,
    pub long_var_wchar: i32,
}

impl Default for TypeCodes {
    fn default() -> Self {
        Self {
            var_char: 200,
            long_var_char: 201,
            var_wchar: 202,
            long_var_wchar: 203,
        }
    }
}

/// Fully rendered patch plan: every marker, anchor, payload, and token map
/// the orchestrator needs, in the target buffer's line-ending convention.
#[derive(Debug, Clone)]
pub struct ProviderPatch {
    /// Constant name whose presence means the narrow type codes exist
    pub constants_marker: String,
    /// Sibling declaration the new constants are inserted before
    pub constants_anchor: String,
    pub constants_payload: String,

    pub helper_name: String,
    /// Definition the helper is inserted in front of
    pub helper_anchor: String,
    pub helper_payload: String,

    pub bulk_insert_name: String,
    pub legacy_block: String,
    pub provider_block: String,
    pub bulk_insert_tokens: TokenMap,

    pub call_sites: Vec<String>,
    /// Closing line of a param block, the preamble insertion point
    pub param_close: String,
    /// Marker proving a call site already carries the preamble
    pub preamble_marker: String,
    pub preamble_block: String,
    pub type_tokens: TokenMap,
}

impl ProviderPatch {
    pub fn new(codes: TypeCodes, newline: LineEnding) -> Self {
        Self {
            constants_marker: "$script:AdTypeVarChar".to_string(),
            constants_anchor: format!("    $script:AdTypeLongVarWChar = {}", codes.long_var_wchar),
            constants_payload: newline.render(&format!(
                "    $script:AdTypeVarChar = {}\n    $script:AdTypeLongVarChar = {}\n",
                codes.var_char, codes.long_var_char
            )),

            helper_name: "Get-InterfaceBulkProviderInfo".to_string(),
            helper_anchor: "function Test-IsAdodbConnection {".to_string(),
            helper_payload: newline.render(PROVIDER_HELPER),

            bulk_insert_name: "Invoke-InterfaceBulkInsertInternal".to_string(),
            legacy_block: newline.render(LEGACY_PROVIDER_BLOCK),
            provider_block: newline.render(PROVIDER_BLOCK),
            bulk_insert_tokens: TokenMap::new()
                .map("$providerInfo['Name']", "$providerInfo.Name")
                .map("$providerInfo['Kind']", "$providerInfo.Kind")
                .map(SCRIPT_TEXT_TYPE, LOCAL_TEXT_TYPE)
                .map(SCRIPT_MEMO_TYPE, LOCAL_MEMO_TYPE),

            call_sites: vec![
                "Invoke-DeviceSummaryParameterized".to_string(),
                "Invoke-InterfaceRowParameterized".to_string(),
            ],
            param_close: newline.render("    )\n"),
            preamble_marker: "$providerInfo = Get-InterfaceBulkProviderInfo".to_string(),
            preamble_block: newline.render(CALL_SITE_PREAMBLE),
            type_tokens: TokenMap::new()
                .map(SCRIPT_TEXT_TYPE, LOCAL_TEXT_TYPE)
                .map(SCRIPT_MEMO_TYPE, LOCAL_MEMO_TYPE),
        }
    }
}
