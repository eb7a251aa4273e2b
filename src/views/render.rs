//! HTML rendering. Markup only; styling is out of scope.

use std::fmt::Write;

use crate::domain::aggregates::FavoriteSet;
use crate::domain::value_objects::ProductId;
use crate::i18n::{text, Message};
use crate::routes::Route;
use crate::{Article, ArticleSummary, Category, Language, Product, ALL_CATEGORIES};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn layout(lang: Language, title: &str, current: &Route, menu_open: bool, body: &str) -> String {
    let other = match lang { Language::Es => Language::En, Language::En => Language::Es };
    let nav_class = if menu_open { "nav open" } else { "nav" };
    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head><meta charset=\"utf-8\"><title>{title} | BambuGoods</title></head>\n<body>\n\
         <header><a href=\"{home}\">BambuGoods</a>\
         <nav class=\"{nav_class}\"><a href=\"{home}\">{products}</a> <a href=\"{blog}\">{blog_label}</a> \
         <a href=\"{switch}\">{other_code}</a></nav></header>\n<main>\n{body}\n</main>\n\
         <footer>{note}</footer>\n</body>\n</html>\n",
        title = escape(title),
        home = Route::Home.href(lang),
        blog = Route::Blog.href(lang),
        products = text(Message::AllProducts, lang),
        blog_label = text(Message::Blog, lang),
        switch = escape(&current.href(other)),
        other_code = other.code().to_uppercase(),
        note = text(Message::AffiliateNote, lang),
    )
}

pub fn error_banner(message: &str) -> String {
    format!("<div class=\"error\" role=\"alert\">{}</div>", escape(message))
}

pub fn loading(lang: Language) -> String {
    format!("<p class=\"loading\">{}</p>", text(Message::Loading, lang))
}

pub fn category_filters(lang: Language, categories: &[Category], selected: &str, search: &str) -> String {
    let mut out = String::from("<ul class=\"categories\">");
    let all_class = if selected == ALL_CATEGORIES { " class=\"selected\"" } else { "" };
    let _ = write!(out, "<li{all_class}><a href=\"/?lang={lang}\">{}</a></li>", text(Message::AllProducts, lang));
    for c in categories {
        let class = if c.id == selected { " class=\"selected\"" } else { "" };
        let _ = write!(
            out,
            "<li{class}><a href=\"/?lang={lang}&amp;category={id}\" data-icon=\"{icon}\">{name}</a></li>",
            id = escape(&urlencoding::encode(&c.id)),
            icon = escape(&c.icon),
            name = escape(&c.name),
        );
    }
    out.push_str("</ul>");
    let _ = write!(
        out,
        "<form method=\"get\" action=\"/\"><input type=\"hidden\" name=\"lang\" value=\"{lang}\">\
         <input type=\"hidden\" name=\"category\" value=\"{cat}\">\
         <input type=\"search\" name=\"search\" value=\"{search}\"></form>",
        cat = escape(selected),
        search = escape(search),
    );
    out
}

pub fn product_card(lang: Language, product: &Product, favorites: &FavoriteSet) -> String {
    let is_favorite = ProductId::new(product.id.as_str()).map(|id| favorites.contains(&id)).unwrap_or(false);
    let mut out = format!("<article class=\"product\" data-category=\"{}\">", escape(&product.category));
    let _ = write!(
        out,
        "<img src=\"{img}\" alt=\"{name}\"><h3>{name}</h3><p>{desc}</p>\
         <p class=\"price\">{price} <del>{original}</del></p>",
        img = escape(&product.image),
        name = escape(&product.name),
        desc = escape(&product.description),
        price = product.price(),
        original = product.original_price(),
    );
    if let Some(pct) = product.discount_percent() {
        let _ = write!(out, "<span class=\"discount\">-{pct}%</span>");
    }
    let _ = write!(
        out,
        "<p class=\"rating\">{:.1}/5 ({} {})</p>",
        product.stars(),
        product.reviews,
        text(Message::Reviews, lang),
    );
    if !product.features.is_empty() {
        out.push_str("<ul class=\"features\">");
        for f in &product.features {
            let _ = write!(out, "<li>{}</li>", escape(f));
        }
        out.push_str("</ul>");
    }
    let _ = write!(
        out,
        "<form method=\"post\" action=\"/favorites/{id}?lang={lang}\"><button aria-pressed=\"{is_favorite}\">{marker} {label}</button></form>\
         <a class=\"affiliate\" rel=\"nofollow sponsored\" href=\"{link}\">{view}</a></article>",
        id = escape(&urlencoding::encode(&product.id)),
        marker = if is_favorite { "♥" } else { "♡" },
        label = text(Message::Favorite, lang),
        link = escape(&product.amazon_link),
        view = text(Message::ViewOnAmazon, lang),
    );
    out
}

pub fn product_grid(lang: Language, products: &[Product], favorites: &FavoriteSet) -> String {
    if products.is_empty() {
        return format!("<p class=\"empty\">{}</p>", text(Message::NoProducts, lang));
    }
    let mut out = String::from("<section class=\"products\">");
    for p in products {
        out.push_str(&product_card(lang, p, favorites));
    }
    out.push_str("</section>");
    out
}

pub fn article_list(lang: Language, articles: &[ArticleSummary]) -> String {
    if articles.is_empty() {
        return format!("<p class=\"empty\">{}</p>", text(Message::NoArticles, lang));
    }
    let mut out = String::from("<section class=\"articles\">");
    for a in articles {
        let _ = write!(
            out,
            "<article><img src=\"{img}\" alt=\"{title}\"><h2><a href=\"{href}\">{title}</a></h2>\
             <p class=\"meta\">{author} · {date}</p><p>{excerpt}</p></article>",
            img = escape(&a.featured_image),
            title = escape(&a.title),
            href = escape(&Route::Article(a.slug.clone()).href(lang)),
            author = escape(&a.author),
            date = format_date(lang, &a.published_date),
            excerpt = escape(&a.excerpt),
        );
    }
    out.push_str("</section>");
    out
}

/// Article bodies are trusted HTML from the backend and are not escaped.
pub fn article_detail(lang: Language, article: &Article, related: &[ArticleSummary]) -> String {
    let mut out = format!(
        "<a href=\"{back}\">← {back_label}</a><article class=\"post\"><img src=\"{img}\" alt=\"{title}\">\
         <h1>{title}</h1><p class=\"meta\">{author} · {date}</p><div class=\"content\">{content}</div>",
        back = Route::Blog.href(lang),
        back_label = text(Message::BackToBlog, lang),
        img = escape(&article.featured_image),
        title = escape(&article.title),
        author = escape(&article.author),
        date = format_date(lang, &article.published_date),
        content = article.content,
    );
    if !article.tags.is_empty() {
        out.push_str("<ul class=\"tags\">");
        for t in &article.tags {
            let _ = write!(out, "<li>#{}</li>", escape(t));
        }
        out.push_str("</ul>");
    }
    let products = article.ordered_products();
    if !products.is_empty() {
        let _ = write!(out, "<section class=\"recommended\"><h2>{}</h2>", text(Message::RecommendedProducts, lang));
        for p in products {
            let _ = write!(
                out,
                "<div class=\"recommendation\"><h3>{title}</h3><p>{desc}</p>\
                 <a class=\"affiliate\" rel=\"nofollow sponsored\" href=\"{link}\">{view}</a></div>",
                title = escape(&p.title),
                desc = escape(&p.description),
                link = escape(&p.amazon_link),
                view = text(Message::ViewOnAmazon, lang),
            );
        }
        let _ = write!(out, "<p class=\"note\">{}</p></section>", text(Message::AffiliateNote, lang));
    }
    out.push_str("</article>");
    if !related.is_empty() {
        let _ = write!(out, "<aside><h2>{}</h2>{}</aside>", text(Message::RelatedArticles, lang), article_list(lang, related));
    }
    out
}

fn format_date(lang: Language, date: &chrono::NaiveDateTime) -> String {
    match lang {
        Language::Es => date.format("%d/%m/%Y").to_string(),
        Language::En => date.format("%B %-d, %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::UserId;
    use crate::tests::product_json;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_product_card() {
        let product: Product = serde_json::from_value(product_json("p1", "Cepillo <Bambú>", "cepillos-bambu")).unwrap();
        let mut favorites = FavoriteSet::new(UserId::new("user_a_1").unwrap());
        favorites.add(ProductId::new("p1").unwrap());
        let html = product_card(Language::Es, &product, &favorites);
        assert!(html.contains("Cepillo &lt;Bambú&gt;"));
        assert!(html.contains("€8.99"));
        assert!(html.contains("<del>€12.99</del>"));
        assert!(html.contains("-31%"));
        assert!(html.contains("234 reseñas"));
        assert!(html.contains("aria-pressed=\"true\""));
        assert!(html.contains("https://amazon.es/dp/ejemplo1"));
    }

    #[test]
    fn test_ids_are_percent_encoded_in_links() {
        let product: Product = serde_json::from_value(product_json("p 1&x", "Jabón", "cuidado corporal")).unwrap();
        let html = product_card(Language::En, &product, &FavoriteSet::new(UserId::new("user_a_1").unwrap()));
        assert!(html.contains("action=\"/favorites/p%201%26x?lang=en\""));

        let categories = vec![Category { id: "cuidado corporal".into(), name: "Cuidado".into(), icon: "leaf".into() }];
        assert!(category_filters(Language::Es, &categories, ALL_CATEGORIES, "").contains("category=cuidado%20corporal"));
    }

    #[test]
    fn test_dates_localized() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(format_date(Language::Es, &date), "10/03/2024");
        assert_eq!(format_date(Language::En, &date), "March 10, 2024");
    }
}
