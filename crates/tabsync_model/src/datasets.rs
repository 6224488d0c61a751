//! Built-in dataset catalog for research-records applications.
//!
//! Each function returns the schema of one standard dataset. The column
//! sets mirror the record keeping of a faculty research profile: journal
//! and conference publications, books, patents, online courses, awards,
//! funding, doctoral guidance, consulting, MoUs, seminars, and invited
//! talks.

use crate::column::ColumnDescriptor;
use crate::schema::TableSchema;

/// Journal publications.
pub fn journals() -> TableSchema {
    TableSchema::new(
        "journals",
        "Journals",
        vec![
            ColumnDescriptor::text("authorName", "Author"),
            ColumnDescriptor::text("paperTitle", "Title"),
            ColumnDescriptor::text("journalName", "Journal"),
            ColumnDescriptor::text("doi", "DOI"),
            ColumnDescriptor::text("issn", "ISSN"),
            ColumnDescriptor::text("indexedIn", "Indexed In"),
            ColumnDescriptor::number("impactFactor", "Impact Factor"),
            ColumnDescriptor::number("year", "Year"),
        ],
    )
    .with_required(&["paperTitle", "year"])
    .with_identity("doi")
    .with_sort_by("year")
}

/// Conference papers.
pub fn conferences() -> TableSchema {
    TableSchema::new(
        "conferences",
        "Conferences",
        vec![
            ColumnDescriptor::text("paperSno", "SNo"),
            ColumnDescriptor::text("authorDetails", "Author Details"),
            ColumnDescriptor::text("paperTitle", "Title"),
            ColumnDescriptor::text("conferenceName", "Conference"),
            ColumnDescriptor::text("publisher", "Publisher"),
            ColumnDescriptor::text("doiOrUrl", "DOI/URL"),
            ColumnDescriptor::text("indexedIn", "Indexed In"),
            ColumnDescriptor::number("year", "Year"),
        ],
    )
    .with_required(&["paperTitle", "year"])
    .with_sort_by("year")
}

/// Books and book chapters.
pub fn books() -> TableSchema {
    TableSchema::new(
        "books",
        "Books / Chapters",
        vec![
            ColumnDescriptor::text("authorName", "Author"),
            ColumnDescriptor::text("title", "Title"),
            ColumnDescriptor::text("bookTitle", "Book Title"),
            ColumnDescriptor::text("isbn", "ISBN"),
            ColumnDescriptor::text("publisher", "Publisher"),
            ColumnDescriptor::number("year", "Year"),
        ],
    )
    .with_required(&["title", "year"])
    .with_identity("isbn")
    .with_sort_by("year")
}

/// Patents.
pub fn patents() -> TableSchema {
    TableSchema::new(
        "patents",
        "Patents",
        vec![
            ColumnDescriptor::text("patentTitle", "Title"),
            ColumnDescriptor::text("patentNumber", "Patent Number"),
            ColumnDescriptor::text("authors", "Authors"),
            ColumnDescriptor::text("status", "Status"),
            ColumnDescriptor::text("country", "Country"),
            ColumnDescriptor::number("year", "Year"),
            ColumnDescriptor::text("link", "Link"),
        ],
    )
    .with_required(&["patentTitle", "year"])
    .with_identity("patentNumber")
    .with_sort_by("year")
}

/// NPTEL course completions.
pub fn nptel_courses() -> TableSchema {
    TableSchema::new(
        "nptel-courses",
        "NPTEL Courses",
        vec![
            ColumnDescriptor::text("courseName", "Course"),
            ColumnDescriptor::text("instructorName", "Instructor"),
            ColumnDescriptor::text("platformLink", "Platform Link"),
            ColumnDescriptor::number("completionYear", "Year"),
            ColumnDescriptor::text("certificateUrl", "Certificate"),
            ColumnDescriptor::text("duration", "Duration"),
        ],
    )
    .with_required(&["courseName"])
    .with_sort_by("completionYear")
}

/// Awards and recognition.
pub fn awards() -> TableSchema {
    TableSchema::new(
        "awards",
        "Awards & Recognition",
        vec![
            ColumnDescriptor::text("awardName", "Award"),
            ColumnDescriptor::text("awardingBody", "Awarding Body"),
            ColumnDescriptor::number("year", "Year"),
            ColumnDescriptor::text("detailsLink", "Details/Link"),
        ],
    )
    .with_required(&["awardName"])
    .with_sort_by("year")
}

/// Funded research projects.
pub fn funding_research() -> TableSchema {
    TableSchema::new(
        "funding-research",
        "Funding Research",
        vec![
            ColumnDescriptor::text("agencyName", "Funding Agency"),
            ColumnDescriptor::text("proposalTitle", "Proposal Title"),
            ColumnDescriptor::number("amountReceived", "Amount Received"),
            ColumnDescriptor::number("yearReceived", "Year"),
        ],
    )
    .with_required(&["proposalTitle"])
    .with_sort_by("yearReceived")
}

/// Doctoral candidates guided.
pub fn phd_guided() -> TableSchema {
    TableSchema::new(
        "phd-guided",
        "PhD Guided",
        vec![
            ColumnDescriptor::text("candidateName", "Candidate Name"),
            ColumnDescriptor::number("researchYear", "Year of Research"),
            ColumnDescriptor::text("university", "University"),
            ColumnDescriptor::text("status", "Status"),
        ],
    )
    .with_required(&["candidateName"])
    .with_sort_by("researchYear")
}

/// Consulting engagements.
pub fn consulting() -> TableSchema {
    TableSchema::new(
        "consulting",
        "Consulting Details",
        vec![
            ColumnDescriptor::text("companyName", "Company"),
            ColumnDescriptor::text("projectTitle", "Project Title"),
            ColumnDescriptor::number("amountReceived", "Amount Received"),
            ColumnDescriptor::number("year", "Year"),
            ColumnDescriptor::text("status", "Status"),
        ],
    )
    .with_required(&["companyName"])
    .with_sort_by("year")
}

/// Memoranda of understanding.
pub fn mou() -> TableSchema {
    TableSchema::new(
        "mou",
        "MoUs",
        vec![
            ColumnDescriptor::text("companyName", "Company"),
            ColumnDescriptor::text("purpose", "Purpose"),
            ColumnDescriptor::text("duration", "Duration"),
        ],
    )
    .with_required(&["companyName"])
}

/// Seminars and workshops conducted.
pub fn seminars() -> TableSchema {
    TableSchema::new(
        "seminars",
        "Seminars",
        vec![
            ColumnDescriptor::text("eventName", "Event"),
            ColumnDescriptor::text("title", "Title"),
            ColumnDescriptor::text("fundingAgency", "Funding Agency"),
            ColumnDescriptor::number("amountReceived", "Amount Received"),
        ],
    )
    .with_required(&["eventName"])
}

/// Invited talks delivered.
pub fn invited_talks() -> TableSchema {
    TableSchema::new(
        "invited-talks",
        "Invited Talks",
        vec![
            ColumnDescriptor::text("facultyName", "Faculty"),
            ColumnDescriptor::text("title", "Title"),
            ColumnDescriptor::text("invitedAt", "Invited At"),
            ColumnDescriptor::date("date", "Date"),
        ],
    )
    .with_required(&["title"])
}

/// Returns every dataset in the catalog.
pub fn all() -> Vec<TableSchema> {
    vec![
        journals(),
        conferences(),
        books(),
        patents(),
        nptel_courses(),
        awards(),
        funding_research(),
        phd_guided(),
        consulting(),
        mou(),
        seminars(),
        invited_talks(),
    ]
}
