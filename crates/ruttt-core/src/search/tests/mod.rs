//! search モジュールのテスト

mod descent;
