/// Self-service profile update.
///
/// `username` names the target account; it is compared against the acting
/// principal and never written. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub username: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
}
