//! JavaScript evaluation scripts
//!
//! Evaluated inside the rendered artist page.

/// Reports whether the document and its images have finished loading
pub const READY_STATE_SCRIPT: &str = r"
    (() => ({
        readyState: document.readyState,
        imagesLoaded: Array.from(document.images).every(img => img.complete),
        bodyExists: document.body !== null
    }))()
";

/// Collects every signal the banner strategies need in one round trip
pub const SNAPSHOT_SCRIPT: &str = r#"
    (() => {
        const describeImage = (img) => {
            const rect = img.getBoundingClientRect();
            return {
                src: img.src || '',
                srcset: img.getAttribute('srcset') || null,
                width: rect.width,
                height: rect.height
            };
        };

        const backgroundOf = (el) => {
            const bg = window.getComputedStyle(el).backgroundImage;
            return bg && bg !== 'none' ? bg : null;
        };

        const images = Array.from(document.querySelectorAll('img'))
            .filter(img => img.src)
            .map(describeImage);

        const backgroundEl = document.querySelector('div[data-testid="background-image"]');

        const entityEl = document.querySelector('div[data-testid="entity-image"]');
        let entity = null;
        if (entityEl) {
            const img = entityEl.querySelector('img');
            entity = {
                image: img && img.src ? describeImage(img) : null,
                background: backgroundOf(entityEl)
            };
        }

        const backgrounds = [];
        for (const el of document.querySelectorAll('*')) {
            const bg = backgroundOf(el);
            if (bg && bg.includes('url(')) {
                backgrounds.push(bg);
            }
        }

        return {
            images,
            background_container: backgroundEl ? backgroundOf(backgroundEl) : null,
            entity_image: entity,
            backgrounds,
            base_uri: document.baseURI
        };
    })()
"#;

/// Hides the automation flag before any page script runs
pub const WEBDRIVER_STEALTH_SCRIPT: &str = r"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => false
    });
";
