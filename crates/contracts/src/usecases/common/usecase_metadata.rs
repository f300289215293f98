/// Метаданные UseCase: идентификация, заголовок страницы и маршрут
pub trait UseCaseMetadata {
    /// Индекс UseCase (например, "u501")
    fn usecase_index() -> &'static str;

    /// Техническое имя (например, "report_upload")
    fn usecase_name() -> &'static str;

    /// Заголовок страницы
    fn display_name() -> &'static str;

    fn description() -> &'static str {
        ""
    }

    /// Полное имя вида "u501_report_upload", используется как id корня страницы
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }
}
