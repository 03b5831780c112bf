//! Prompt construction for the three assistant modes
//!
//! The guardrail instruction is the only place legal behaviour is configured;
//! everything else is delegated to the model.

use crate::i18n::{Language, Strings};

/// Kinds of documents the drafting view can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentType {
    #[default]
    Letter,
    Contract,
    Settlement,
    Rental,
    Labor,
    Iou,
}

impl DocumentType {
    pub fn all() -> [DocumentType; 6] {
        [
            DocumentType::Letter,
            DocumentType::Contract,
            DocumentType::Settlement,
            DocumentType::Rental,
            DocumentType::Labor,
            DocumentType::Iou,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            DocumentType::Letter => "letter",
            DocumentType::Contract => "contract",
            DocumentType::Settlement => "settlement",
            DocumentType::Rental => "rental",
            DocumentType::Labor => "labor",
            DocumentType::Iou => "iou",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(key.trim()))
    }

    pub fn label(&self, strings: &Strings) -> &'static str {
        let types = &strings.draft.types;
        match self {
            DocumentType::Letter => types.letter,
            DocumentType::Contract => types.contract,
            DocumentType::Settlement => types.settlement,
            DocumentType::Rental => types.rental,
            DocumentType::Labor => types.labor,
            DocumentType::Iou => types.iou,
        }
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let i = all.iter().position(|t| *t == self).unwrap_or(0);
        all[(i + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        let i = all.iter().position(|t| *t == self).unwrap_or(0);
        all[(i + all.len() - 1) % all.len()]
    }
}

/// The guardrail system instruction sent with every request
pub fn system_instruction(lang: Language) -> String {
    let mut prompt = String::new();

    prompt.push_str("## [Role Definition]\n");
    prompt.push_str("You are a rigorous Legal Assistant AI. Your goal is to help the user organize the legal facts of their situation, ");
    prompt.push_str("explain the relevant statutes, and perform strict fact-checking before offering any suggestion. ");
    prompt.push_str("You are not a licensed attorney: your replies follow legal reasoning and never deliver a final judgment.\n\n");

    prompt.push_str("## [Fact-Checking Principles]\n");
    prompt.push_str("1. **Jurisdiction first**: law is territorial. Confirm the applicable legal system (e.g. Taiwan, Hong Kong, United States) before giving substantive advice.\n");
    prompt.push_str("2. **Evidence oriented**: distinguish what the user states from what can be proven. Ask which evidence exists for key facts (contracts, message logs).\n");
    prompt.push_str("3. **Currency**: statutes are amended. When citing a provision, remind the user to verify the latest version.\n");
    prompt.push_str("4. **No unlawful advice**: never describe how to evade taxes, fabricate evidence, or escape legal liability.\n\n");

    prompt.push_str("## [Guardrail Rules]\n\n");
    prompt.push_str("### Rule 1: Fact Completeness Check\n");
    prompt.push_str("- Trigger: the user asks \"Will I win?\" or \"Is this legal?\".\n");
    prompt.push_str("- Required: list the 3-5 key facts needed to judge the case (signing date, written evidence, ...) ");
    prompt.push_str("and state that any conclusion drawn from incomplete facts risks being misleading.\n\n");
    prompt.push_str("### Rule 2: Jurisdictional Guardrail\n");
    prompt.push_str("- Trigger: a specific offence or civil dispute (fraud, division of marital property, ...).\n");
    prompt.push_str("- Required: ask where the user is located. If they do not say, give general principles and add the label ");
    prompt.push_str("[Note: applicable law varies by jurisdiction].\n\n");
    prompt.push_str("### Rule 3: Unauthorized Practice of Law Guardrail\n");
    prompt.push_str("- Trigger: the user asks you to write a complaint for filing or to negotiate on their behalf.\n");
    prompt.push_str("- Required: decline to act as their lawyer and instead provide a framework of the document and the points to watch, ");
    prompt.push_str("never a final, ready-to-file legal document.\n\n");

    prompt.push_str("## [Output Format]\n");
    prompt.push_str("Every reply involving a legal judgment must contain these sections:\n");
    prompt.push_str("1. **### Legal Fact Sorting**: the key facts known so far.\n");
    prompt.push_str("2. **### Applicable Legal Basis**: the specific provisions (note: verify against the latest amendments).\n");
    prompt.push_str("3. **### Fact-Checking Questions**: questions about the ambiguities the user left open.\n");
    prompt.push_str("4. **### Risk Warning & Recommendations**: include a statute of limitations reminder and the statement ");
    prompt.push_str("\"This reply is for reference only and is not formal legal advice; consult a practicing lawyer.\"\n\n");

    prompt.push_str("**Language Setting**:\n");
    prompt.push_str(&format!(
        "Always reply in {} ({}).\n",
        lang.native_name(),
        lang.code()
    ));
    prompt.push_str(&format!(
        "If drafting a document: Content must be in **Traditional Chinese**, followed by a summary in {}.\n",
        lang.native_name()
    ));

    prompt
}

/// Task prompt for the drafting view
pub fn draft_prompt(doc_label: &str, details: &str, lang: Language) -> String {
    format!(
        "Drafting Task: Document Type: {}. User Details: {}. Generate a professional document in Traditional Chinese, then a summary in {}.",
        doc_label,
        details.trim(),
        lang.native_name()
    )
}

/// Task prompt for the risk analysis view
pub fn analyze_prompt(content: &str, lang: Language) -> String {
    format!(
        "Analyze: {}. Output in {} following the structured formatting rules.",
        content.trim(),
        lang.native_name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_names_reply_language() {
        let prompt = system_instruction(Language::Vi);
        assert!(prompt.contains("Always reply in Tiếng Việt (vi)."));
        assert!(prompt.contains("followed by a summary in Tiếng Việt"));
    }

    #[test]
    fn test_system_instruction_has_all_guardrails() {
        let prompt = system_instruction(Language::En);
        for heading in [
            "Fact Completeness Check",
            "Jurisdictional Guardrail",
            "Unauthorized Practice of Law",
            "Legal Fact Sorting",
            "Applicable Legal Basis",
            "Fact-Checking Questions",
            "Risk Warning & Recommendations",
        ] {
            assert!(prompt.contains(heading), "missing {heading}");
        }
    }

    #[test]
    fn test_draft_prompt_format() {
        let prompt = draft_prompt("IOU", "  Lent Bob NT$5000 on 1 May  ", Language::Ja);
        assert_eq!(
            prompt,
            "Drafting Task: Document Type: IOU. User Details: Lent Bob NT$5000 on 1 May. Generate a professional document in Traditional Chinese, then a summary in 日本語."
        );
    }

    #[test]
    fn test_analyze_prompt_format() {
        let prompt = analyze_prompt("Clause 7: tenant forfeits deposit", Language::En);
        assert_eq!(
            prompt,
            "Analyze: Clause 7: tenant forfeits deposit. Output in English following the structured formatting rules."
        );
    }

    #[test]
    fn test_document_type_cycle_and_labels() {
        assert_eq!(DocumentType::default(), DocumentType::Letter);
        assert_eq!(DocumentType::Iou.next(), DocumentType::Letter);
        assert_eq!(DocumentType::Letter.prev(), DocumentType::Iou);
        assert_eq!(DocumentType::Rental.label(Language::En.strings()), "Lease Agreement");
        assert_eq!(DocumentType::from_key("LABOR"), Some(DocumentType::Labor));
        assert_eq!(DocumentType::from_key("will"), None);
    }
}
