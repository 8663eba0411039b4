//! What the scoring oracle is told, and the shape it must answer in.

use crate::results::{FindingCategory, Severity};
use serde_json::{Value, json};

/// Name attached to the structured-output format
pub const SCHEMA_NAME: &str = "gdpr_scan_result";

/// Fixed instruction preamble sent with every evaluation
pub const INSTRUCTIONS: &str = r#"You are a GDPR compliance signal scanner. You review evidence bundles collected from a website and produce structured findings.

IMPORTANT:
- This is NOT legal advice. You report signals, never legal determinations.
- Call everything a "signal" and be honest about what could not be checked.
- Be specific and helpful, but never claim certainty about compliance status.

SCORING GUIDE (score is 0-100; 100 = few risk signals, 0 = major signals missing):
- 80-100: Few risk signals; basic compliance signals present
- 50-79: Some gaps or missing signals
- 20-49: Significant gaps in compliance signals
- 0-19: Major compliance signals missing

CHECK FOR THESE SIGNALS:
A) Privacy Policy: presence, controller identity, contact details, purposes, lawful basis, retention, sharing, transfers, rights, supervisory authority
B) Cookies/Consent: banner present, manage-preferences option, categories, non-essential scripts loaded before consent
C) Data Collection: forms present, consent or purpose statements near forms, "Do not sell/share" links
D) User Rights: access, deletion, rectification, portability and objection mentions; a contact method for requests
E) Security/Transfers: HTTPS, international transfer mentions, data protection measures

Keep the summary under 80 words. Evidence snippets must quote the site and stay under 200 characters.
Return ONLY the JSON object described by the schema."#;

/// Prefix for the user input that carries the bundle
pub const INPUT_PREFIX: &str = "Analyze this website evidence bundle and return the JSON assessment:\n\n";

/// JSON schema constraining the reply to exactly the `ScanResult` shape
pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "score": { "type": "number" },
            "summary": { "type": "string" },
            "findings": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "enum": FindingCategory::ALL },
                        "severity": { "type": "string", "enum": Severity::ALL },
                        "title": { "type": "string" },
                        "description": { "type": "string" },
                        "evidence": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "url": { "type": "string" },
                                    "snippet": { "type": "string" }
                                },
                                "required": ["url", "snippet"],
                                "additionalProperties": false
                            }
                        },
                        "recommendation": { "type": "string" }
                    },
                    "required": [
                        "category",
                        "severity",
                        "title",
                        "description",
                        "evidence",
                        "recommendation"
                    ],
                    "additionalProperties": false
                }
            },
            "limitations": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["score", "summary", "findings", "limitations"],
        "additionalProperties": false
    })
}

/// The `text.format` block of a Responses API request
pub fn response_format() -> Value {
    json!({
        "format": {
            "type": "json_schema",
            "name": SCHEMA_NAME,
            "schema": output_schema(),
            "strict": true
        }
    })
}
