use poem_openapi::Object;

#[derive(Object, Debug)]
pub struct SendMessageRequestDto {
    #[oai(validator(min_length = 1))]
    pub recipient: String,
    #[oai(validator(min_length = 1, max_length = 4096))]
    pub message: String,
}

#[derive(Object, Debug)]
pub struct StartBroadcastRequestDto {
    #[oai(validator(min_length = 1, max_length = 4096))]
    pub message: String,
    #[oai(validator(min_length = 1))]
    pub recipient_list_id: String,
    pub attachment: Option<String>,
}
