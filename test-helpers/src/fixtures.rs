//! Valid request bodies for each collection.

use payloads::{
    Priority,
    requests::AddAdmin,
    resources::{
        announcement::{AnnouncementDraft, AnnouncementStatus},
        application::{
            EntityType, IncubationForm, InnovationCategory, PreIncubationForm,
            Shareholder, TeamMember, TechnologyCategory,
        },
        blog::{BlogDraft, BlogStatus},
        contact::{ContactDraft, ContactSource},
        event::{EventDetails, EventDraft, EventMode, EventStatus, EventType},
        mentor::MentorDraft,
        program::ProgramDraft,
    },
};
use rust_decimal::Decimal;

pub fn announcement_draft(title: &str) -> AnnouncementDraft {
    AnnouncementDraft {
        title: title.to_string(),
        description: "Applications for the spring cohort are now open."
            .to_string(),
        link: "https://apiic.example.org/cohort".to_string(),
        status: AnnouncementStatus::Published,
        priority: Priority::High,
        is_active: true,
        published_at: None,
        expires_at: None,
    }
}

pub fn mentor_draft(name: &str, email: &str) -> MentorDraft {
    MentorDraft {
        name: name.to_string(),
        email: email.to_string(),
        phone: "+91-9000000000".to_string(),
        designation: "Partner".to_string(),
        company: "Northwind Ventures".to_string(),
        expertise: vec!["Fundraising".into(), "Go-to-market".into()],
        bio: "Twenty years of early-stage investing.".to_string(),
        profile_image: None,
        linkedin_profile: Some("https://www.linkedin.com/in/example".into()),
    }
}

pub fn event_draft(title: &str, kind: EventType, date: &str) -> EventDraft {
    EventDraft {
        title: title.to_string(),
        description: "Hands-on session for incubated founders.".to_string(),
        date: date.to_string(),
        kind,
        venue: Some("Innovation Hall".into()),
        speaker: None,
        mode: Some(EventMode::InPerson),
        details: EventDetails {
            audience: Some("Founders".into()),
            duration: Some("3 hours".into()),
            ..EventDetails::default()
        },
        status: EventStatus::Upcoming,
    }
}

pub fn blog_draft(title: &str) -> BlogDraft {
    BlogDraft {
        title: title.to_string(),
        content: "What we learned running our first demo day.".to_string(),
        cover_image: None,
        tags: vec!["demo-day".into()],
        status: BlogStatus::Published,
        is_active: Some(true),
        link: None,
    }
}

pub fn program_draft(title: &str) -> ProgramDraft {
    ProgramDraft {
        title: title.to_string(),
        duration: Some("6 months".into()),
        bullets: vec!["Office space".into(), "Mentor network".into()],
        is_active: Some(true),
        link: None,
    }
}

pub fn contact_draft(first_name: &str, subject: &str) -> ContactDraft {
    ContactDraft {
        first_name: first_name.to_string(),
        last_name: "Sharma".to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        phone: None,
        organization: Some("Acme Labs".into()),
        subject: subject.to_string(),
        message: "We would like to know more about incubation.".to_string(),
        subscribe_newsletter: true,
        source: Some(ContactSource::Website),
    }
}

pub fn incubation_application(
    applicant: &str,
    innovation: &str,
) -> IncubationForm {
    IncubationForm {
        applicant_name: applicant.to_string(),
        applicant_email: format!(
            "{}@example.com",
            applicant.to_lowercase().replace(' ', ".")
        ),
        qualification: "M.Tech".to_string(),
        entity_type: EntityType::Startup,
        innovation_title: innovation.to_string(),
        category: InnovationCategory::Product,
        innovation_description: "Low-cost soil moisture sensing.".to_string(),
        employees_onsite: 3,
        lab_access: true,
        ..IncubationForm::default()
    }
}

pub fn pre_incubation_application(
    applicant: &str,
    company: &str,
) -> PreIncubationForm {
    PreIncubationForm {
        applicant_name: applicant.to_string(),
        company_name: company.to_string(),
        founding_team: vec![TeamMember {
            name: applicant.to_string(),
            address: "Bengaluru".to_string(),
            contact: "+91-9000000001".to_string(),
        }],
        shareholding_structure: vec![Shareholder {
            name: applicant.to_string(),
            shares: 1000,
            percentage: Decimal::ONE_HUNDRED,
            designation: "Founder".to_string(),
        }],
        technology_category: TechnologyCategory::SelfDeveloped,
        ..PreIncubationForm::default()
    }
}

pub fn add_admin(name: &str, email: &str) -> AddAdmin {
    AddAdmin {
        name: name.to_string(),
        email: email.to_string(),
        password: "reviewer-password".to_string(),
        role: None,
    }
}
