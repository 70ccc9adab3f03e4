// End-to-end tests for the TTS Studio control surface
//
// Each test starts the full axum app on an ephemeral port. A mockito server
// stands in for the remote provider (ElevenLabs or a self-hosted backend) and
// a scripted speech backend stands in for the platform speech engine, so the
// suite runs on hosts without network access or audio devices.

mod test_health;
mod test_self_hosted;
