use catalog_core::{
    Movie, MovieResponse, Weather,
    browser::Tab,
    city::MockCity,
    model::{format_release_date, image_url},
};

pub fn movie_page(response: &MovieResponse) {
    movie_table(&response.results);
    println!(
        "\nPage {} of {} ({} results)",
        response.page, response.total_pages, response.total_results
    );
}

pub fn movie_table(movies: &[Movie]) {
    if movies.is_empty() {
        println!("No movies found.");
        return;
    }

    println!("{}", header(Tab::Movies, &[8, 40, 14, 6, 8]));
    for m in movies {
        println!(
            "{:<8} {:<40} {:<14} {:>6.1} {:>8}",
            m.id,
            truncate(&m.title, 40),
            format_release_date(&m.release_date),
            m.rating,
            m.vote_count
        );
    }
}

pub fn movie_details(movie: &Movie, image_base: &str) {
    println!("{} (id {})", movie.title, movie.id);
    println!("  Released:   {}", format_release_date(&movie.release_date));
    println!("  Rating:     {:.1}/10 from {} votes", movie.rating, movie.vote_count);
    println!("  Popularity: {:.1}", movie.popularity);
    println!("  Poster:     {}", image_url(image_base, movie.poster_path.as_deref()));
    println!("  Backdrop:   {}", image_url(image_base, movie.backdrop_path.as_deref()));
    if !movie.overview.is_empty() {
        println!("\n{}", movie.overview);
    }
}

pub fn weather_table(rows: &[Weather], total_results: u64) {
    if rows.is_empty() {
        println!("No weather data.");
    } else {
        println!("{}", header(Tab::Weather, &[18, 7, 16, 28, 12, 16]));
        for w in rows {
            println!(
                "{:<18} {:<7} {:>16} {:<28} {:>12} {:>16.1}",
                truncate(&w.city_name, 18),
                w.country,
                w.temperature,
                truncate(w.description.as_deref().unwrap_or("-"), 28),
                w.humidity,
                w.wind_speed
            );
        }
    }
    println!("\n{} of {} cities", rows.len(), total_results);
}

pub fn weather_details(w: &Weather) {
    println!("{}, {}", w.city_name, w.country);
    println!("  {}", w.description.as_deref().unwrap_or("-"));
    println!("  Temperature: {}°C (feels like {}°C)", w.temperature, w.feels_like);
    println!("  Humidity:    {}%", w.humidity);
    println!("  Pressure:    {} hPa", w.pressure);
    println!("  Wind:        {:.1} m/s from {}°", w.wind_speed, w.wind_direction);
    println!("  Visibility:  {} m", w.visibility);
    println!("  Clouds:      {}%", w.cloudiness);
}

pub fn cities(cities: &[MockCity]) {
    for c in cities {
        println!("{:<16} {:<3} {:>9.4} {:>10.4}", c.name, c.country, c.lat, c.lon);
    }
}

pub fn city(c: &MockCity) {
    println!("{}, {}", c.name, c.country);
    println!("  Latitude:  {:.4}", c.lat);
    println!("  Longitude: {:.4}", c.lon);
}

fn header(tab: Tab, widths: &[usize]) -> String {
    // The poster column renders as the movie id.
    let labels = tab
        .columns()
        .iter()
        .map(|c| if c.key == "poster_path" { "Id" } else { c.label });

    labels
        .zip(widths.iter().copied())
        .map(|(label, w)| format!("{label:<w$}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
