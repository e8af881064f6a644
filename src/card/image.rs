use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::Engine;
use futures::future::join_all;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tiny_skia::Pixmap;
use tokio::sync::RwLock;
use tracing::{debug, info, trace, warn};
use usvg::fontdb::Database;
use usvg::{Options, Tree};

use super::RenderRequest;
use crate::error::AppError;
use crate::football::SelectedMatch;
use crate::locale::Locale;

const SVG_TEMPLATE: &str = include_str!("../../assets/card_template.svg");

const FONT_FAMILY: &str = "Noto Sans Thai, Noto Sans Lao, Noto Sans, DejaVu Sans, sans-serif";

// Layout, in pixels
const WIDTH: u32 = 1080;
const MIN_HEIGHT: u32 = 1080;
const HEADER_HEIGHT: u32 = 170;
const BODY_TOP: u32 = 220;
const ROW_HEIGHT: u32 = 76;
const FOOTER_HEIGHT: u32 = 130;
const LOGO_CENTER_X: u32 = 300;
const LOGO_RADIUS: u32 = 28;
const DIVIDER_MARGIN: u32 = 140;

const LOGO_TTL: Duration = Duration::from_secs(24 * 3600);
const LOGO_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
struct CachedLogo {
    data_uri: String,
    fetched_at: Instant,
}

/// In-memory cache of league logos, stored as data URIs ready to embed.
struct LogoCache {
    entries: RwLock<HashMap<String, CachedLogo>>,
    ttl: Duration,
}

impl LogoCache {
    fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Failures are logged and never cached.
    async fn get_or_fetch(&self, http: &Client, url: &str) -> Option<String> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(url).filter(|e| e.fetched_at.elapsed() <= self.ttl) {
                trace!(url, "🖼️ Logo cache hit");
                return Some(entry.data_uri.clone());
            }
        }

        trace!(url, "🖼️ Fetching logo");
        let response = match http.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(
                    url,
                    status = response.status().as_u16(),
                    "🖼️ ⚠️ Logo fetch failed"
                );
                return None;
            }
            Err(e) => {
                warn!(url, error = ?e, "🖼️ ⚠️ Logo request failed");
                return None;
            }
        };

        // An unlabelled body is assumed to be PNG; anything labelled non-image is rejected.
        let mime = match response.headers().get(CONTENT_TYPE) {
            None => "image/png".to_string(),
            Some(value) => {
                let mime = value
                    .to_str()
                    .unwrap_or_default()
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase();
                if !mime.starts_with("image/") {
                    warn!(url, content_type = %mime, "🖼️ ⚠️ Logo response is not an image");
                    return None;
                }
                mime
            }
        };

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(url, error = ?e, "🖼️ ⚠️ Failed to read logo bytes");
                return None;
            }
        };

        let b64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let data_uri = format!("data:{mime};base64,{b64}");

        self.entries.write().await.insert(
            url.to_string(),
            CachedLogo {
                data_uri: data_uri.clone(),
                fetched_at: Instant::now(),
            },
        );

        debug!(url, "🖼️ ✅ Logo cached");
        Some(data_uri)
    }
}

/// Consecutive matches of one league, in selector order.
#[derive(Debug)]
pub struct LeagueGroup<'a> {
    pub league: &'a str,
    pub logo: Option<&'a str>,
    pub matches: Vec<&'a SelectedMatch>,
}

/// Groups matches by league; leagues keep the order of their first appearance.
pub fn group_by_league(matches: &[SelectedMatch]) -> Vec<LeagueGroup<'_>> {
    let mut groups: Vec<LeagueGroup<'_>> = Vec::new();

    for selected in matches {
        let league = selected.fixture.league.as_str();
        match groups.iter_mut().find(|group| group.league == league) {
            Some(group) => group.matches.push(selected),
            None => groups.push(LeagueGroup {
                league,
                logo: selected.fixture.league_logo.as_deref(),
                matches: vec![selected],
            }),
        }
    }

    groups
}

/// One row per league header plus one per match, never below [`MIN_HEIGHT`].
pub fn canvas_height(row_count: usize) -> u32 {
    let rows = u32::try_from(row_count).unwrap_or(u32::MAX / ROW_HEIGHT);
    (BODY_TOP + rows * ROW_HEIGHT + FOOTER_HEIGHT).max(MIN_HEIGHT)
}

pub struct ImageGenerator {
    http: Client,
    logos: LogoCache,
    fontdb: Arc<Database>,
}

impl ImageGenerator {
    pub fn new(font_dir: Option<&Path>) -> Result<Self, AppError> {
        let http = Client::builder()
            .user_agent("BigMatchBot/1.0")
            .timeout(LOGO_FETCH_TIMEOUT)
            .build()?;

        let mut fontdb = Database::new();
        fontdb.load_system_fonts();
        if let Some(dir) = font_dir {
            fontdb.load_fonts_dir(dir);
        }
        info!(font_count = fontdb.len(), "🖼️ Loaded fonts");

        Ok(Self {
            http,
            logos: LogoCache::new(LOGO_TTL),
            fontdb: Arc::new(fontdb),
        })
    }

    pub async fn generate_card(&self, request: &RenderRequest<'_>) -> Result<Vec<u8>, AppError> {
        let svg = self.build_svg(request).await;
        self.render_svg_to_png(&svg)
    }

    pub(crate) async fn build_svg(&self, request: &RenderRequest<'_>) -> String {
        let groups = group_by_league(request.matches);

        let logos: Vec<Option<String>> = join_all(groups.iter().map(|group| async move {
            match group.logo {
                Some(url) => self.logos.get_or_fetch(&self.http, url).await,
                None => None,
            }
        }))
        .await;

        let height = canvas_height(groups.len() + request.matches.len());

        let mut clip_paths = String::new();
        let mut rows = String::new();
        let mut y = BODY_TOP;

        for (i, (group, logo)) in groups.iter().zip(&logos).enumerate() {
            let cy = y + ROW_HEIGHT / 2;

            clip_paths.push_str(&format!(
                "    <clipPath id=\"logo{i}\"><circle cx=\"{LOGO_CENTER_X}\" cy=\"{cy}\" r=\"{LOGO_RADIUS}\"/></clipPath>\n"
            ));
            rows.push_str(&format!(
                "  <circle class=\"logo-ring\" cx=\"{LOGO_CENTER_X}\" cy=\"{cy}\" r=\"{r}\" fill=\"#000000\" fill-opacity=\"0.35\" stroke=\"#ffd700\" stroke-width=\"4\"/>\n",
                r = LOGO_RADIUS + 3
            ));
            if let Some(data_uri) = logo {
                rows.push_str(&format!(
                    "  <image x=\"{x}\" y=\"{top}\" width=\"{size}\" height=\"{size}\" preserveAspectRatio=\"xMidYMid meet\" clip-path=\"url(#logo{i})\" xlink:href=\"{data_uri}\"/>\n",
                    x = LOGO_CENTER_X - LOGO_RADIUS,
                    top = cy - LOGO_RADIUS,
                    size = LOGO_RADIUS * 2,
                ));
            }
            rows.push_str(&format!(
                "  <text x=\"{x}\" y=\"{baseline}\" font-family=\"{FONT_FAMILY}\" font-size=\"34\" font-weight=\"bold\" fill=\"#ffd700\">{league}</text>\n",
                x = LOGO_CENTER_X + LOGO_RADIUS + 20,
                baseline = cy + 12,
                league = xml_escape(group.league),
            ));
            y += ROW_HEIGHT;

            for selected in &group.matches {
                rows.push_str(&format!(
                    "  <text x=\"{center}\" y=\"{baseline}\" text-anchor=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"34\" fill=\"#ffffff\" stroke=\"#1a0000\" stroke-width=\"6\" stroke-linejoin=\"round\" paint-order=\"stroke\">{line}</text>\n",
                    center = WIDTH / 2,
                    baseline = y + ROW_HEIGHT / 2 + 12,
                    line = xml_escape(&match_line(selected, request.locale)),
                ));
                rows.push_str(&format!(
                    "  <line x1=\"{DIVIDER_MARGIN}\" y1=\"{divider}\" x2=\"{x2}\" y2=\"{divider}\" stroke=\"#ffd700\" stroke-opacity=\"0.35\" stroke-width=\"1.5\"/>\n",
                    divider = y + ROW_HEIGHT - 4,
                    x2 = WIDTH - DIVIDER_MARGIN,
                ));
                y += ROW_HEIGHT;
            }
        }

        let strings = request.locale.strings();

        SVG_TEMPLATE
            .replace("{{width}}", &WIDTH.to_string())
            .replace("{{height}}", &height.to_string())
            .replace("{{header_height}}", &HEADER_HEIGHT.to_string())
            .replace("{{center_x}}", &(WIDTH / 2).to_string())
            .replace("{{date_x}}", &(WIDTH - 36).to_string())
            .replace("{{footer_y}}", &(height - FOOTER_HEIGHT / 2).to_string())
            .replace("{{border_width}}", &(WIDTH - 16).to_string())
            .replace("{{border_height}}", &(height - 16).to_string())
            .replace("{{font_family}}", FONT_FAMILY)
            .replace("{{title}}", &xml_escape(request.title))
            .replace("{{date}}", &request.locale.format_date(request.date))
            .replace("{{brand}}", &xml_escape(strings.brand))
            .replace("{{clip_paths}}", &clip_paths)
            .replace("{{rows}}", &rows)
    }

    fn render_svg_to_png(&self, svg_content: &str) -> Result<Vec<u8>, AppError> {
        let options = Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };

        let tree =
            Tree::from_str(svg_content, &options).map_err(|e| AppError::ImageGeneration {
                message: format!("Failed to parse SVG: {}", e),
            })?;

        let size = tree.size();
        let width = size.width() as u32;
        let height = size.height() as u32;

        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| AppError::ImageGeneration {
            message: "Failed to create pixmap".to_string(),
        })?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        let png_data = pixmap.encode_png().map_err(|e| AppError::ImageGeneration {
            message: format!("Failed to encode PNG: {}", e),
        })?;

        debug!(
            width,
            height,
            size = png_data.len(),
            "🖼️ ✅ Card generated"
        );
        Ok(png_data)
    }
}

/// Played matches show the score between the teams, others the kickoff time.
fn match_line(selected: &SelectedMatch, locale: Locale) -> String {
    let fixture = &selected.fixture;
    match fixture.score_display() {
        Some(score) => format!("{}  {}  {}", fixture.home_team, score, fixture.away_team),
        None => format!(
            "{}  |  {} vs {}",
            selected.kickoff_for(locale),
            fixture.home_team,
            fixture.away_team
        ),
    }
}

fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
