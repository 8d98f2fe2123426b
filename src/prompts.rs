//! Category-specific extraction prompts.
//!
//! Centralising every template here serves two purposes:
//!
//! 1. **Single source of truth** — changing a requested field or schema
//!    shape requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect templates directly without
//!    calling a real provider, making prompt regressions easy to catch.
//!
//! Templates form a tagged lookup keyed by [`DocumentCategory`]: adding a
//! category means adding a table entry, not editing control flow. Each
//! template declares its expected JSON schema inline as instructional text
//! (field names, types, nullability); the schema shapes the request only —
//! the parser never enforces it on the response.

use crate::classify::DocumentCategory;

/// One extraction template: a role/schema preamble plus the label used
/// to introduce the verbatim document text.
struct PromptTemplate {
    preamble: &'static str,
    text_label: &'static str,
}

const INVOICE_TEMPLATE: PromptTemplate = PromptTemplate {
    preamble: r#"You are an expert at extracting structured information from invoices.
Your task is to extract the following entities from the provided invoice text and present them in a JSON format.
Ensure the JSON is valid and complete. If a field is not found, set its value to `null`.

Expected JSON Schema:
```json
{
    "invoice_number": "string | null",
    "date": "string (YYYY-MM-DD format) | null",
    "vendor_name": "string | null",
    "customer_name": "string | null",
    "total_amount": "string (e.g., '123.45') | null",
    "currency": "string (e.g., 'USD', 'EUR') | null",
    "items": [
        {
            "description": "string | null",
            "quantity": "number | null",
            "unit_price": "string (e.g., '10.00') | null",
            "line_total": "string (e.g., '100.00') | null"
        }
    ],
    "payment_terms": "string | null",
    "summary": "A concise, one-sentence summary of the invoice, including vendor, total, and purpose."
}
```"#,
    text_label: "Invoice Text",
};

const CONTRACT_TEMPLATE: PromptTemplate = PromptTemplate {
    preamble: r#"You are an expert at extracting key information and summarizing legal contracts.
Your task is to extract the following entities from the provided contract text and present them in a JSON format.
Ensure the JSON is valid and complete. If a field is not found, set its value to `null`.

Expected JSON Schema:
```json
{
    "contract_title": "string | null",
    "parties": "array of strings (names of parties involved) | null",
    "effective_date": "string (YYYY-MM-DD format) | null",
    "termination_date": "string (YYYY-MM-DD format) | null",
    "governing_law": "string | null",
    "key_clauses_summary": "A brief summary (2-3 sentences) of the most important clauses (e.g., scope of work, payment terms, liability, intellectual property).",
    "overall_summary": "A one-paragraph overall summary of the contract's purpose, main agreements, and duration."
}
```"#,
    text_label: "Contract Text",
};

const FORM_TEMPLATE: PromptTemplate = PromptTemplate {
    preamble: r#"You are an expert at extracting information from various forms.
Your task is to extract key fields from the provided form text and present them in a JSON format.
Identify common form fields like Name, Address, Phone, Email, Date of Birth, etc., along with any specific fields
that appear to be relevant to the form's purpose.
Ensure the JSON is valid and complete. If a field is not found, set its value to `null`.

Expected JSON Schema (adapt based on detected fields):
```json
{
    "form_type": "string (e.g., 'Application Form', 'Registration Form') | null",
    "applicant_name": "string | null",
    "address": "string | null",
    "phone_number": "string | null",
    "email": "string | null",
    "date_of_birth": "string (YYYY-MM-DD format) | null",
    "purpose_of_form": "string | null",
    "summary": "A concise summary of the form's content and purpose."
}
```
Adapt the fields in the JSON schema based on the content of the form."#,
    text_label: "Form Text",
};

const GENERAL_TEMPLATE: PromptTemplate = PromptTemplate {
    preamble: r#"You are a highly intelligent assistant capable of understanding and summarizing any document.
Your task is to extract the most important entities and provide a concise summary from the provided text.
Present the extracted information and summary in a JSON format.
Ensure the JSON is valid and complete. If a field is not found or not applicable, set its value to `null`.

Expected JSON Schema:
```json
{
    "document_main_topic": "string | null",
    "key_entities": "array of strings (important names, places, dates, concepts) | null",
    "main_points": "array of strings (bullet points of key takeaways) | null",
    "overall_summary": "A one-paragraph comprehensive summary of the document's content and purpose."
}
```"#,
    text_label: "Document Text",
};

fn template_for(category: DocumentCategory) -> &'static PromptTemplate {
    match category {
        DocumentCategory::Invoice => &INVOICE_TEMPLATE,
        DocumentCategory::Contract => &CONTRACT_TEMPLATE,
        DocumentCategory::Form => &FORM_TEMPLATE,
        DocumentCategory::General => &GENERAL_TEMPLATE,
    }
}

/// Build the extraction prompt for a category, embedding the full document
/// text verbatim.
///
/// The document text is never truncated here; any length limiting is the
/// caller's concern. Every prompt ends with an explicit instruction to emit
/// only the structured output, no prose wrapper.
pub fn build_prompt(category: DocumentCategory, document_text: &str) -> String {
    let template = template_for(category);
    format!(
        "{preamble}\n\n{label}:\n---\n{text}\n---\n\nPlease provide only the JSON output.\n",
        preamble = template.preamble,
        label = template.text_label,
        text = document_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_prompt_declares_schema_and_embeds_text() {
        let prompt = build_prompt(DocumentCategory::Invoice, "INVOICE #42 from Acme");
        assert!(prompt.contains("\"invoice_number\""));
        assert!(prompt.contains("\"items\""));
        assert!(prompt.contains("INVOICE #42 from Acme"));
        assert!(prompt.trim_end().ends_with("Please provide only the JSON output."));
    }

    #[test]
    fn contract_prompt_requests_both_summaries() {
        let prompt = build_prompt(DocumentCategory::Contract, "AGREEMENT");
        assert!(prompt.contains("\"key_clauses_summary\""));
        assert!(prompt.contains("\"overall_summary\""));
        assert!(prompt.contains("Contract Text:"));
    }

    #[test]
    fn form_prompt_allows_adaptive_fields() {
        let prompt = build_prompt(DocumentCategory::Form, "Application");
        assert!(prompt.contains("\"applicant_name\""));
        assert!(prompt.contains("Adapt the fields"));
    }

    #[test]
    fn document_text_is_verbatim_even_with_braces() {
        let text = "weird {braces} and ```fences``` stay intact";
        let prompt = build_prompt(DocumentCategory::General, text);
        assert!(prompt.contains(text));
    }

    #[test]
    fn every_category_has_a_template() {
        for category in [
            DocumentCategory::Invoice,
            DocumentCategory::Contract,
            DocumentCategory::Form,
            DocumentCategory::General,
        ] {
            let prompt = build_prompt(category, "x");
            assert!(prompt.contains("JSON"), "{category} template must request JSON");
        }
    }
}
