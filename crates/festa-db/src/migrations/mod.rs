//! The migration chain, one file per step.
//!
//! Steps are frozen SQL text: they record what ran against real
//! databases and never change after shipping, even when the declared
//! model in `festa_schema` moves on. Step 0002 creates
//! `event.location_id` with ON DELETE CASCADE; step 0012 relaxes it to
//! SET NULL, which is where the chain converges on the current model.

mod m0001_create_user;
mod m0002_create_event;
mod m0003_create_comment;
mod m0004_create_attendance;
mod m0005_create_follow_vote;
mod m0006_create_tag;
mod m0007_create_media;
mod m0008_create_conversation;
mod m0009_create_corporate_profile;
mod m0010_create_share;
mod m0011_create_annotation;
mod m0012_event_location_set_null;
