//! Translator implementations.

pub mod yandex;

pub use yandex::YandexTranslator;
