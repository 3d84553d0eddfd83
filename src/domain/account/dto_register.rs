#[derive(Debug, Clone)]
pub struct RegisterAccountDto {
    pub username: String,
    pub password: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
}
