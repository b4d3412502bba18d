// region:    --- Imports
use tracing::info;
// endregion: --- Imports

// region:    --- Config
/// 환경 변수 미설정 시 사용하는 기본 카테고리 목록
const DEFAULT_CATEGORIES: &str =
    "Books,Electronics,Fashion,Food,Furniture,Gadgets,Health,Home,Property,Sports,Toys";

/// 기본 바인드 주소
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// 서비스 설정
/// 카테고리 집합은 코드가 아니라 설정으로 공급된다
pub struct Config {
    pub categories: Vec<String>,
    pub bind_addr: String,
}

impl Config {
    /// 환경 변수에서 설정 로드
    /// AUCTION_CATEGORIES: 쉼표로 구분된 카테고리 목록
    /// SERVER_ADDR: 리스너 바인드 주소
    pub fn from_env() -> Self {
        let categories = std::env::var("AUCTION_CATEGORIES")
            .unwrap_or_else(|_| DEFAULT_CATEGORIES.to_string());
        let bind_addr =
            std::env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let config = Self::from_csv(&categories, bind_addr);
        info!(
            "{:<12} --> 설정 로드: 카테고리 {}개",
            "Config",
            config.categories.len()
        );
        config
    }

    /// 쉼표로 구분된 카테고리 문자열로 설정 생성
    pub fn from_csv(categories: &str, bind_addr: String) -> Self {
        let categories = categories
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Config {
            categories,
            bind_addr,
        }
    }

    /// 설정된 카테고리인지 확인
    pub fn is_valid_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}
// endregion: --- Config

// endregion: --- Tests
