/// Spider names. These double as the first segment of every meeting id.
pub const LOSCA_CITY_PLANNING: &str = "losca_city_planning";
pub const LOSCA_HEALTH_COMMISSION: &str = "losca_health_commission";

// City Planning API
pub const CITY_PLANNING_AGENCY: &str = "Los Angeles City Planning";
pub const CITY_PLANNING_TIMEZONE: &str = "America/Chicago";
pub const CITY_PLANNING_API: &str = "https://planning.lacity.gov/dcpapi/meetings/api/all";
/// Meeting categories exposed by the planning API, one start URL each
pub const CITY_PLANNING_CATEGORIES: [&str; 3] = ["commissions", "boards", "hearings"];

// Health Commission (PrimeGov portal)
pub const HEALTH_COMMISSION_AGENCY: &str = "Los Angeles Health Commission";
pub const HEALTH_COMMISSION_TIMEZONE: &str = "America/Los_Angeles";
pub const HEALTH_COMMISSION_API: &str =
    "https://lacity.primegov.com/api/v2/PublicPortal/ListArchivedMeetingsByCommitteeId";
pub const HEALTH_COMMISSION_NAME: &str = "Los Angeles City Health Commission";
pub const HEALTH_COMMISSION_ADDRESS: &str =
    "200 N Spring St, Room 340 (CITY HALL) Los Angeles, CA 90012";
pub const PRIMEGOV_MEETING_URL: &str = "https://lacity.primegov.com/Portal/Meeting?meetingTemplateId=";
pub const PRIMEGOV_COMPILED_DOCUMENT_URL: &str =
    "https://lacity.primegov.com/Public/CompiledDocument?meetingTemplateId=";

/// Label given to the dedicated video link
pub const VIDEO_LINK_TITLE: &str = "videoLink";

/// Placeholder segment between the start time and the title slug in ids
pub const ID_PLACEHOLDER: &str = "x";

/// Get all supported spider names
pub fn get_supported_spiders() -> Vec<&'static str> {
    vec![LOSCA_CITY_PLANNING, LOSCA_HEALTH_COMMISSION]
}
