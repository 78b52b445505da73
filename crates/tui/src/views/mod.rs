pub mod analytics;
pub mod journal;
pub mod modal;
pub mod onboarding;
pub mod profile;
pub mod tab_bar;
pub mod tracking;
pub mod welcome;
