pub const TITLE: &str = "HubSpot Lead Enricher";
pub const DESCRIPTION: &str = "Enter lead details to enrich company data.";
pub const INPUT_LABEL: &str = "Lead Identifier (e.g., Email or Company Domain)";
pub const INPUT_PLACEHOLDER: &str = "example@company.com or company.com";
pub const SUBMIT_LABEL: &str = "Enrich Lead";
pub const LOADING_LABEL: &str = "Enriching...";
pub const RESULT_HEADING: &str = "Enrichment Result:";
pub const PROMPT: &str = "> ";
