pub mod astro_body;
pub mod launch_stages;
pub mod propulsion;
pub mod rocket;
pub mod structure;
