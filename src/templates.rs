use maud::{DOCTYPE, Markup, html};

use crate::{csrf, entities::movie, models::FormErrors, tmdb::SearchCandidate};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";

pub fn home_page(movies: &[movie::Model]) -> String {
    page(
        "My Top Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    div class="flex items-start justify-between gap-6" {
                        div {
                            h1 class="text-3xl font-bold text-gray-900" { "My Top Movies" }
                            p class="mt-2 text-gray-600" { "Ranked by your own ratings." }
                        }
                        a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add" { "Add Movie" }
                    }

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No movies yet. Search for one to get started." }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for movie in movies {
                                (movie_card(movie))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn add_page(token: &str, title: &str, errors: &FormErrors) -> String {
    form_page(
        "Add a Movie",
        html! {
            form class="mt-8 space-y-6" method="post" action="/add" {
                (form_error(errors))
                input type="hidden" name=(csrf::FIELD) value=(token);
                div {
                    label class="block text-sm font-medium text-gray-700" for="title" { "Movie Title" }
                    input class=(INPUT_CLASS) name="title" id="title" value=(title) required;
                    (field_error(errors, "title"))
                }
                button class=(BUTTON_CLASS) type="submit" { "Add Movie" }
            }
        },
    )
}

pub fn select_page(query: &str, candidates: &[SearchCandidate]) -> String {
    form_page(
        "Select a Movie",
        html! {
            p class="mt-2 text-gray-600" { "Results for \u{201c}" (query) "\u{201d}" }
            @if candidates.is_empty() {
                p class="mt-6 text-gray-700" { "No matches found." }
                a class="mt-4 inline-block text-blue-600 hover:text-blue-800" href="/add" { "Try another title" }
            } @else {
                ul class="mt-6 divide-y divide-gray-200" {
                    @for candidate in candidates {
                        li class="py-3" {
                            a class="text-blue-600 hover:text-blue-800" href=(format!("/find?id={}", candidate.id)) {
                                (candidate.title)
                                span class="ml-2 text-gray-500" {
                                    "("
                                    @match candidate.year() {
                                        Some(year) => { (year) }
                                        None => { "unknown" }
                                    }
                                    ")"
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn edit_page(
    movie: &movie::Model,
    token: &str,
    rating: &str,
    review: &str,
    errors: &FormErrors,
) -> String {
    form_page(
        "Edit Rating",
        html! {
            p class="mt-2 text-gray-600" { (movie.title) " (" (movie.year) ")" }
            form class="mt-8 space-y-6" method="post" action=(format!("/update?id={}", movie.id)) {
                (form_error(errors))
                input type="hidden" name=(csrf::FIELD) value=(token);
                div {
                    label class="block text-sm font-medium text-gray-700" for="rating" { "Your Rating out of 10 e.g. 7.5" }
                    input class=(INPUT_CLASS) name="rating" id="rating" value=(rating) required;
                    (field_error(errors, "rating"))
                }
                div {
                    label class="block text-sm font-medium text-gray-700" for="review" { "Your Review" }
                    input class=(INPUT_CLASS) name="review" id="review" value=(review) maxlength="250" required;
                    (field_error(errors, "review"))
                }
                button class=(BUTTON_CLASS) type="submit" { "Done" }
            }
        },
    )
}

pub fn error_page(heading: &str, message: &str) -> String {
    page(
        heading,
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { (heading) }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

pub fn format_rating(rating: f64) -> String {
    rating.to_string()
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn form_page(heading: &str, inner: Markup) -> String {
    page(
        heading,
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { (heading) }
                        (inner)
                    }
                    a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/" { "Back to list" }
                }
            }
        },
    )
}

fn movie_card(movie: &movie::Model) -> Markup {
    let rank = movie.ranking.map(|r| r.to_string()).unwrap_or_default();

    html! {
        article class="bg-white shadow rounded-lg p-6 flex gap-6" data-title=(movie.title) data-rank=(rank) {
            div class="w-12 shrink-0 text-3xl font-bold text-gray-400" {
                @match movie.ranking {
                    Some(r) => { "#" (r) }
                    None => { "\u{2014}" }
                }
            }
            @if !movie.img_url.is_empty() {
                img class="w-24 shrink-0 rounded" src=(movie.img_url) alt=(movie.title);
            }
            div class="flex-1" {
                h2 class="text-xl font-semibold text-gray-900" {
                    (movie.title)
                    span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                }
                p class="mt-2 text-sm text-gray-700" { (movie.description) }
                p class="mt-3 font-medium text-gray-900" {
                    @match movie.rating {
                        Some(rating) => { (format_rating(rating)) "/10" }
                        None => { span class="text-gray-500" { "Not rated yet" } }
                    }
                }
                @if let Some(review) = &movie.review {
                    p class="mt-1 italic text-gray-600" { "\u{201c}" (review) "\u{201d}" }
                }
                div class="mt-4 flex gap-4 text-sm" {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/update?id={}", movie.id)) { "Update" }
                    a class="text-red-600 hover:text-red-800" href=(format!("/delete?id={}", movie.id)) { "Delete" }
                }
            }
        }
    }
}

fn form_error(errors: &FormErrors) -> Markup {
    html! {
        @if let Some(message) = &errors.form {
            p class="rounded-md bg-red-50 px-3 py-2 text-sm text-red-700" { (message) }
        }
    }
}

fn field_error(errors: &FormErrors, field: &str) -> Markup {
    html! {
        @if let Some(message) = errors.field(field) {
            p class="mt-2 text-sm text-red-600" { (message) }
        }
    }
}
