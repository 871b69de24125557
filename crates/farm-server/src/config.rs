//! Конфигурация сервера фермы.

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Адрес для прослушивания (например "0.0.0.0:8080")
    pub listen: String,

    /// URL подключения к БД
    pub db_url: String,

    /// Заполнять ли пустую базу начальными данными
    pub seed: bool,
}
