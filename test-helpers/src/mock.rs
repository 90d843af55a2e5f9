//! Realistic data for the development server and for tests that want a
//! populated backend.
//!
//! Everything goes through the public API as the super admin, so records get
//! the same server-side defaults a real dashboard session would produce.

use crate::{TestApp, fixtures};
use anyhow::Result;
use payloads::{
    Announcement, Blog, ContactSubmission, EntityId, Event,
    IncubationApplication, Mentor, PreIncubationApplication, Program,
    Resource, resources::event::EventType,
};

pub struct DevDataset {
    pub announcements: Vec<Announcement>,
    pub mentors: Vec<Mentor>,
    pub events: Vec<Event>,
    pub blogs: Vec<Blog>,
    pub programs: Vec<Program>,
    pub contacts: Vec<ContactSubmission>,
    pub incubation: Vec<IncubationApplication>,
    pub pre_incubation: Vec<PreIncubationApplication>,
}

impl DevDataset {
    pub async fn create(app: &TestApp) -> Result<Self> {
        app.login_admin().await?;

        tracing::info!("📣 Creating announcements");
        let mut announcements = Vec::new();
        for title in [
            "Spring cohort applications open",
            "Demo day on the main campus",
            "New prototyping lab hours",
        ] {
            let draft = fixtures::announcement_draft(title);
            announcements.push(create::<Announcement>(app, &draft).await?);
        }

        tracing::info!("🧑‍🏫 Creating mentors");
        let mut mentors = Vec::new();
        for (name, email) in [
            ("Asha Rao", "asha.rao@example.com"),
            ("Vikram Iyer", "vikram.iyer@example.com"),
        ] {
            let draft = fixtures::mentor_draft(name, email);
            mentors.push(create::<Mentor>(app, &draft).await?);
        }
        // One inactive mentor so the public list differs from the admin list.
        let retired = EntityId::from(app.seed_mentor("Meera Nair", false)?);
        mentors.push(app.client.get::<Mentor>(&retired).await?);

        tracing::info!("🗓️ Creating events");
        let mut events = Vec::new();
        for (title, kind, date) in [
            ("Pitch practice", EventType::Workshop, "2030-03-10T10:00:00Z"),
            ("Founders' fireside", EventType::Seminar, "2030-04-02T17:30:00Z"),
            ("Hardware hackathon", EventType::Hackathon, "2030-05-18T09:00:00Z"),
        ] {
            let draft = fixtures::event_draft(title, kind, date);
            events.push(create::<Event>(app, &draft).await?);
        }

        tracing::info!("📝 Creating blog posts and programs");
        let draft = fixtures::blog_draft("Lessons from our first demo day");
        let blogs = vec![create::<Blog>(app, &draft).await?];
        let mut programs = Vec::new();
        for title in ["Incubation", "Pre-incubation"] {
            let draft = fixtures::program_draft(title);
            programs.push(create::<Program>(app, &draft).await?);
        }

        tracing::info!("✉️ Creating contact submissions");
        let mut contacts = Vec::new();
        for (first_name, subject) in [
            ("Priya", "Incubation eligibility"),
            ("Rahul", "Lab access for students"),
        ] {
            let draft = fixtures::contact_draft(first_name, subject);
            contacts.push(create::<ContactSubmission>(app, &draft).await?);
        }

        tracing::info!("📥 Creating applications");
        let draft =
            fixtures::incubation_application("Kiran Das", "Soil moisture mesh");
        let incubation =
            vec![create::<IncubationApplication>(app, &draft).await?];
        let draft =
            fixtures::pre_incubation_application("Neha Singh", "Loom Analytics");
        let pre_incubation =
            vec![create::<PreIncubationApplication>(app, &draft).await?];

        Ok(Self {
            announcements,
            mentors,
            events,
            blogs,
            programs,
            contacts,
            incubation,
            pre_incubation,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📊 Development dataset:");
        tracing::info!("   📣 {} announcements", self.announcements.len());
        tracing::info!(
            "   🧑‍🏫 {} mentors ({} active)",
            self.mentors.len(),
            self.mentors.iter().filter(|m| m.is_active).count()
        );
        tracing::info!("   🗓️ {} events", self.events.len());
        tracing::info!(
            "   📝 {} blog posts, {} programs",
            self.blogs.len(),
            self.programs.len()
        );
        tracing::info!("   ✉️ {} contact submissions", self.contacts.len());
        tracing::info!(
            "   📥 {} incubation and {} pre-incubation applications",
            self.incubation.len(),
            self.pre_incubation.len()
        );
    }
}

/// Create a record and return the server's copy of it.
async fn create<R: Resource>(app: &TestApp, draft: &R::Draft) -> Result<R> {
    app.client
        .create::<R>(draft)
        .await?
        .ok_or_else(|| anyhow::anyhow!("{} was not echoed back", R::LABEL))
}
