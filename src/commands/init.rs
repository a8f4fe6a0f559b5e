//! Initialize a new blog

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Site
title: Status Code 417
author:
  name: JFE
  summary: "Hello! Dis my blog:"
description: A starter blog
site_url: https://www.statuscode417.com/
social:
  github: john-law

# Directory
content_dir: content/blog
assets_dir: content/assets
public_dir: public
ignore: []

# Writing
timezone: UTC
date_format: "%B %d, %Y"
excerpt_length: 160
strict: false

images:
  max_width: 590
iframes:
  wrapper_style: "margin-bottom: 1.0725rem"
highlight:
  theme: base16-ocean.dark
  line_number: false

# About page
about:
  - Engineer.
  - Based in Lisbon.
  - Currently building Web Apps.
  - Worked in Private Equity and IB in a former life, now I'm back at building things.
  - "Interests include: Web Development, Machine Learning, Finance."
  - Proud owner of the best dog in the world.
"#;

const HELLO_WORLD: &str = r#"---
title: Hello World
date: {date}
description: The first post of a brand new blog.
---

Welcome to your new blog! Posts live in `content/blog`, one directory per
post with an `index.md` inside.

<!-- more -->

## Quick Start

### Create a new post

```bash
$ statusblog new "My New Post"
```

### Run server

```bash
$ statusblog server
```

### Generate static files

```bash
$ statusblog generate
```
"#;

/// Icons the bio and the post footer point at
const ICONS: &[(&str, &str)] = &[
    (
        "about-icon.svg",
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="16" height="16"><circle cx="12" cy="8" r="4"/><path d="M4 21c0-4.4 3.6-8 8-8s8 3.6 8 8z"/></svg>
"#,
    ),
    (
        "github-icon.svg",
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="16" height="16"><path d="M12 .5a12 12 0 0 0-3.8 23.4c.6.1.8-.3.8-.6v-2c-3.3.7-4-1.6-4-1.6-.6-1.4-1.4-1.8-1.4-1.8-1-.7.1-.7.1-.7 1.2.1 1.8 1.2 1.8 1.2 1 1.8 2.8 1.3 3.5 1 .1-.8.4-1.3.8-1.6-2.7-.3-5.5-1.3-5.5-6 0-1.2.5-2.3 1.3-3.1-.2-.4-.6-1.6.1-3.2 0 0 1-.3 3.3 1.2a11.5 11.5 0 0 1 6 0C17.3 4.6 18.3 5 18.3 5c.7 1.6.2 2.8.1 3.2.8.8 1.3 1.9 1.3 3.1 0 4.6-2.8 5.6-5.5 5.9.4.4.8 1.1.8 2.2v3.3c0 .3.2.7.8.6A12 12 0 0 0 12 .5z"/></svg>
"#,
    ),
    (
        "back-icon.svg",
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="16" height="16"><path d="M20 11H7.8l5.6-5.6L12 4l-8 8 8 8 1.4-1.4L7.8 13H20z"/></svg>
"#,
    ),
];

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("{:?} already contains a _config.yml", target_dir);
    }

    let post_dir = target_dir.join("content/blog/hello-world");
    fs::create_dir_all(&post_dir).with_context(|| format!("Failed to create {:?}", post_dir))?;
    let assets_dir = target_dir.join("content/assets");
    fs::create_dir_all(&assets_dir)?;
    for (name, svg) in ICONS {
        fs::write(assets_dir.join(name), svg)?;
    }

    fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    fs::write(
        post_dir.join("index.md"),
        HELLO_WORLD.replace("{date}", &today),
    )?;

    tracing::info!("Initialized blog in {:?}", target_dir);
    Ok(())
}
