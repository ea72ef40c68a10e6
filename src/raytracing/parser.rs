use thiserror::Error;

use super::{
    camera::Camera,
    colour::Colour,
    core::{Light, Material, Scene},
    math::{Box3, Mat4, Vec3},
    model::load_model,
    solid::{Plane, Solid, Sphere, Triangle},
};

/// Width of the view plane, in world units, when the scene does not give a `viewport`.
const DEFAULT_VIEWPORT_WIDTH: f64 = 1.0;

/// Tokenizer and recursive descent parser for scene files.
pub struct SceneParser {
    content: Vec<char>,
    lookahead: Option<String>,
    position: FilePosition,
    /// Where the most recently lexed token starts.
    token_start: FilePosition,
}

/// Zero-based location in the scene file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilePosition {
    pub line: u32,
    pub column: u32,
    index: usize,
}

impl FilePosition {
    fn step(&mut self, consumed: char) {
        self.index += 1;
        if consumed == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

#[derive(Debug, Error)]
#[error("{message} at {}:{}", .position.line + 1, .position.column + 1)]
pub struct ParserError {
    pub position: FilePosition,
    pub message: String,
}

impl ParserError {
    /// The offending line of `content` with a caret under the error column.
    pub fn error_location(&self, content: &str) -> Option<String> {
        let line = content.lines().nth(self.position.line as usize)?;
        let spacing = " ".repeat(self.position.column as usize);
        Some(format!("{}\n{}^", line, spacing))
    }
}

type ParserResult<T> = Result<T, ParserError>;

fn error_at<T>(position: FilePosition, message: &str) -> ParserResult<T> {
    Err(ParserError {
        position,
        message: message.to_string(),
    })
}

/// Everything needed to render one image.
#[derive(Debug)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub camera: Camera,
    pub scene: Scene,
}

impl SceneParser {
    pub fn new(content: &str) -> SceneParser {
        SceneParser {
            content: content.chars().collect(),
            lookahead: None,
            position: FilePosition::default(),
            token_start: FilePosition::default(),
        }
    }

    fn current(&self) -> Option<char> {
        self.content.get(self.position.index).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let consumed = self.current()?;
        self.position.step(consumed);
        Some(consumed)
    }

    fn bump_while(&mut self, token: &mut String, accept: impl Fn(char) -> bool) {
        while let Some(next) = self.current().filter(|c| accept(*c)) {
            token.push(next);
            self.bump();
        }
    }

    /// Skips whitespace and `#` comments.
    fn skip_blanks(&mut self) {
        loop {
            match self.current() {
                Some('#') => while self.bump().is_some_and(|c| c != '\n') {},
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                _ => return,
            }
        }
    }

    /// Reads the next token; empty at the end of the input.
    fn lex(&mut self) -> String {
        self.skip_blanks();
        self.token_start = self.position;
        let mut token = String::new();
        let Some(first) = self.bump() else {
            return token;
        };
        token.push(first);

        match first {
            '"' => {
                while let Some(c) = self.bump() {
                    token.push(c);
                    if c == '"' {
                        break;
                    }
                }
            }
            '+' | '-' | '.' | '0'..='9' => {
                self.bump_while(&mut token, |c| c.is_ascii_digit());
                if first != '.' && self.current() == Some('.') {
                    token.push('.');
                    self.bump();
                }
                self.bump_while(&mut token, |c| c.is_ascii_digit());
            }
            c if c.is_alphabetic() => self.bump_while(&mut token, char::is_alphabetic),
            // punctuation and unknown symbols are single char tokens
            _ => {}
        }
        token
    }

    fn pop(&mut self) -> String {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.lex(),
        }
    }

    fn peek(&mut self) -> &str {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.lex());
        }
        self.lookahead.as_deref().unwrap_or_default()
    }

    /// Start of the token the next `pop` will return.
    fn next_token_start(&mut self) -> FilePosition {
        self.peek();
        self.token_start
    }

    fn is_empty(&mut self) -> bool {
        self.peek().is_empty()
    }

    /// Fails at the start of the last token read.
    fn error<T>(&self, message: &str) -> ParserResult<T> {
        error_at(self.token_start, message)
    }

    fn parse_float(&mut self) -> ParserResult<f64> {
        let next_token = self.pop();
        match next_token.parse::<f64>() {
            Ok(num) => Ok(num),
            Err(_) => self.error(&format!("cannot interpret '{}' as a number", next_token)),
        }
    }

    fn parse_positive(&mut self, what: &str) -> ParserResult<f64> {
        let value = self.parse_float()?;
        if value > 0.0 {
            Ok(value)
        } else {
            self.error(&format!("{} must be positive, got {}", what, value))
        }
    }

    /// Consumes the next token, failing unless it is `expected`.
    fn match_token(&mut self, expected: &str) -> ParserResult<()> {
        let found = self.pop();
        if found == expected {
            return Ok(());
        }
        self.error(&format!("expected '{}', getting '{}' instead", expected, found))
    }

    /// Consumes the next token only if it is `expected`.
    fn maybe_match(&mut self, expected: &str) -> bool {
        let matched = self.peek() == expected;
        if matched {
            self.lookahead = None;
        }
        matched
    }

    fn parse_header(&mut self) -> ParserResult<(u32, u32)> {
        self.match_token("size")?;
        let width = self.parse_pixels("image width")?;
        let height = self.parse_pixels("image height")?;
        Ok((width, height))
    }

    /// A whole, non-zero number of pixels.
    fn parse_pixels(&mut self, what: &str) -> ParserResult<u32> {
        let next_token = self.pop();
        match next_token.parse::<u32>() {
            Ok(pixels) if pixels > 0 => Ok(pixels),
            _ => self.error(&format!(
                "{} must be a positive whole number of pixels, got '{}'",
                what, next_token
            )),
        }
    }

    fn parse_vec3(&mut self) -> ParserResult<Vec3> {
        self.match_token("(")?;
        let x = self.parse_float()?;
        self.match_token(",")?;
        let y = self.parse_float()?;
        self.match_token(",")?;
        let z = self.parse_float()?;
        self.match_token(")")?;
        Ok(Vec3::new(x, y, z))
    }

    fn parse_colour(&mut self) -> ParserResult<Colour> {
        const NAMED: [(&str, Colour); 10] = [
            ("red", Colour::new(1.0, 0.0, 0.0)),
            ("green", Colour::new(0.0, 1.0, 0.0)),
            ("blue", Colour::new(0.0, 0.0, 1.0)),
            ("white", Colour::WHITE),
            ("black", Colour::BLACK),
            ("cyan", Colour::new(0.0, 1.0, 1.0)),
            ("violet", Colour::new(1.0, 0.0, 1.0)),
            ("yellow", Colour::new(1.0, 1.0, 0.0)),
            ("orange", Colour::new(0.98, 0.45, 0.02)),
            ("grey", Colour::new(0.5, 0.5, 0.5)),
        ];
        for (name, colour) in NAMED {
            if self.maybe_match(name) {
                return Ok(colour);
            }
        }
        let v = self.parse_vec3()?;
        Ok(Colour::new(v.x, v.y, v.z))
    }

    fn parse_material(&mut self) -> ParserResult<Material> {
        let mut material = Material::default();
        loop {
            if self.maybe_match("ambient") {
                material.ambient = self.parse_colour()?;
            } else if self.maybe_match("diffuse") {
                material.diffuse = self.parse_colour()?;
            } else if self.maybe_match("specular") {
                material.specular = self.parse_colour()?;
            } else if self.maybe_match("shininess") {
                material.shininess = self.parse_float()?;
            } else {
                return Ok(material);
            }
        }
    }

    fn parse_sphere(&mut self) -> ParserResult<(Solid, Material)> {
        self.match_token("sphere")?;
        let center = self.parse_vec3()?;
        let radius = self.parse_positive("sphere radius")?;
        let material = self.parse_material()?;
        Ok((Solid::Sphere(Sphere::new(center, radius)), material))
    }

    fn parse_plane(&mut self) -> ParserResult<(Solid, Material)> {
        self.match_token("plane")?;
        let normal_start = self.next_token_start();
        let normal = self.parse_vec3()?;
        if normal.squared_len() == 0.0 {
            return error_at(normal_start, "plane normal cannot be zero");
        }
        let distance = self.parse_float()?;
        let material = self.parse_material()?;
        Ok((Solid::Plane(Plane::new(normal, distance)), material))
    }

    fn parse_triangle(&mut self) -> ParserResult<(Solid, Material)> {
        self.match_token("triangle")?;
        let v0 = self.parse_vec3()?;
        let v1 = self.parse_vec3()?;
        let v2 = self.parse_vec3()?;
        let material = self.parse_material()?;
        Ok((Solid::Triangle(Triangle::new(v0, v1, v2)), material))
    }

    fn parse_box(&mut self) -> ParserResult<(Solid, Material)> {
        self.match_token("box")?;
        let min = self.parse_vec3()?;
        let max = self.parse_vec3()?;
        let material = self.parse_material()?;
        Ok((Solid::Box(Box3::from_corners(min, max)), material))
    }

    fn parse_string(&mut self) -> ParserResult<String> {
        let next_token = self.pop();
        let unquoted = next_token
            .strip_prefix('"')
            .and_then(|token| token.strip_suffix('"'));
        match unquoted {
            Some(text) => Ok(text.to_string()),
            None => self.error(&format!("expected a quoted string, getting '{}'", next_token)),
        }
    }

    fn parse_camera(&mut self) -> ParserResult<Camera> {
        let camera_start = self.next_token_start();
        self.match_token("camera")?;
        let mut position = Vec3::zero();
        if self.maybe_match("from") {
            position = self.parse_vec3()?;
        }
        let point = if self.maybe_match("to") {
            self.parse_vec3()?
        } else {
            position - Vec3::z_axis()
        };
        if (point - position).squared_len() == 0.0 {
            return error_at(camera_start, "camera cannot look at its own position");
        }
        Ok(Camera::look_at(position, point))
    }

    fn parse_trasformation(&mut self) -> ParserResult<Mat4> {
        let mut trasform = Mat4::identity();
        while self.maybe_match(">") {
            let next_trasform = if self.maybe_match("scale") {
                Mat4::scale(self.parse_float()?)
            } else if self.maybe_match("translate") {
                Mat4::translate(self.parse_vec3()?)
            } else if self.maybe_match("rotate") {
                let axis = self.parse_vec3()?;
                let angle = self.parse_float()?;
                Mat4::rotate(axis, angle)
            } else {
                return self.error("unexpected token while parsing trasform");
            };
            trasform = trasform.then(&next_trasform);
        }
        Ok(trasform)
    }

    fn parse_model(&mut self) -> ParserResult<(Vec<Triangle>, Material)> {
        self.match_token("model")?;
        let path_start = self.next_token_start();
        let path = self.parse_string()?;
        let material = self.parse_material()?;
        let trasform = self.parse_trasformation()?;
        match load_model(&path, &trasform) {
            Ok(triangles) => Ok((triangles, material)),
            Err(err) => error_at(path_start, &err.to_string()),
        }
    }

    fn parse_light(&mut self) -> ParserResult<Light> {
        self.match_token("light")?;
        let position = self.parse_vec3()?;
        let colour = self.parse_colour()?;
        Ok(Light { position, colour })
    }

    /// Parses a whole scene description.
    pub fn parse_scene(&mut self) -> ParserResult<ImageData> {
        let (width, height) = self.parse_header()?;

        let mut camera = None;
        let mut viewport = None;
        let mut scene = Scene::default();
        while !self.is_empty() {
            let next_token = self.peek().to_string();
            match next_token.as_str() {
                "camera" => {
                    if camera.is_some() {
                        return self.error("the camera is defined twice");
                    }
                    camera = Some(self.parse_camera()?);
                }
                "viewport" => {
                    self.pop();
                    let viewport_width = self.parse_positive("viewport width")?;
                    let viewport_height = self.parse_positive("viewport height")?;
                    viewport = Some((viewport_width, viewport_height));
                }
                "background" => {
                    self.pop();
                    scene.background = self.parse_colour()?;
                }
                "light" => {
                    let light = self.parse_light()?;
                    scene.lights.push(light);
                }
                "sphere" => {
                    let (solid, material) = self.parse_sphere()?;
                    scene.add(solid, material);
                }
                "plane" => {
                    let (solid, material) = self.parse_plane()?;
                    scene.add(solid, material);
                }
                "triangle" => {
                    let (solid, material) = self.parse_triangle()?;
                    scene.add(solid, material);
                }
                "box" => {
                    let (solid, material) = self.parse_box()?;
                    scene.add(solid, material);
                }
                "model" => {
                    let (triangles, material) = self.parse_model()?;
                    for triangle in triangles {
                        scene.add(Solid::Triangle(triangle), material);
                    }
                }
                _ => {
                    let message = format!("unexpected token '{}'", next_token);
                    return self.error(&message);
                }
            }
        }

        let (viewport_width, viewport_height) = viewport.unwrap_or((
            DEFAULT_VIEWPORT_WIDTH,
            DEFAULT_VIEWPORT_WIDTH * height as f64 / width as f64,
        ));
        let camera = camera
            .unwrap_or_default()
            .with_viewport(viewport_width, viewport_height);
        Ok(ImageData {
            width,
            height,
            camera,
            scene,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::solid::SolidKind;

    fn parse(content: &str) -> ParserResult<ImageData> {
        SceneParser::new(content).parse_scene()
    }

    #[test]
    fn parses_a_full_scene() {
        let content = r#"
size 64 32
# a comment line
camera from (0, 0, 10) to (0, 0, 0)
viewport 2 1
background (0.1, 0.2, 0.3)
light (0, 10, 10) white
light (-5, 10, 0) (0.5, 0.5, 0.5)
sphere (0, 0, 0) 2 ambient red diffuse (0.5, 0, 0) specular white shininess 50
plane (0, 1, 0) -2 ambient grey   # floor
triangle (-1, 0, -5) (1, 0, -5) (0, 1, -5)
box (-1, -1, -1) (1, 1, 1) diffuse blue
"#;
        let data = parse(content).unwrap();
        assert_eq!((data.width, data.height), (64, 32));
        assert_eq!(data.camera.position(), Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(data.camera.viewport(), (2.0, 1.0));
        assert_eq!(data.scene.background, Colour::new(0.1, 0.2, 0.3));
        assert_eq!(data.scene.lights.len(), 2);
        assert_eq!(data.scene.lights[1].colour, Colour::grey(0.5));

        let kinds: Vec<SolidKind> = data.scene.objects.iter().map(|o| o.solid.kind()).collect();
        assert_eq!(
            kinds,
            vec![SolidKind::Sphere, SolidKind::Plane, SolidKind::Triangle, SolidKind::Box]
        );

        let sphere = &data.scene.objects[0].material;
        assert_eq!(sphere.ambient, Colour::new(1.0, 0.0, 0.0));
        assert_eq!(sphere.diffuse, Colour::new(0.5, 0.0, 0.0));
        assert_eq!(sphere.specular, Colour::WHITE);
        assert_eq!(sphere.shininess, 50.0);
        // unspecified entries keep their defaults
        assert_eq!(data.scene.objects[2].material, Material::default());

        assert_eq!(
            data.scene.objects[1].solid,
            Solid::Plane(Plane::new(Vec3::y_axis(), -2.0))
        );
    }

    #[test]
    fn defaults_without_camera_or_viewport() {
        let data = parse("size 200 100").unwrap();
        assert_eq!(data.camera.position(), Vec3::zero());
        assert_eq!(data.camera.forward(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(data.camera.viewport(), (1.0, 0.5));
        assert_eq!(data.scene.background, Colour::BLACK);
        assert!(data.scene.objects.is_empty());
    }

    #[test]
    fn missing_header_is_reported() {
        let err = parse("sphere (0, 0, 0) 1").unwrap_err();
        assert_eq!(err.message, "expected 'size', getting 'sphere' instead");
    }

    #[test]
    fn error_points_at_the_offending_line() {
        let content = "size 10 10\nsphere (0, 0, x) 1\n";
        let err = parse(content).unwrap_err();
        assert_eq!(err.position.line, 1);
        assert!(err.message.contains("'x'"));
        assert!(err.to_string().ends_with("at 2:15"));
        let location = err.error_location(content).unwrap();
        assert_eq!(location, "sphere (0, 0, x) 1\n              ^");
    }

    #[test]
    fn peeked_tokens_are_reported_where_they_start() {
        let err = parse("size 10 10\n  cone (0, 0, 0) 1").unwrap_err();
        assert_eq!((err.position.line, err.position.column), (1, 2));

        let err = parse("size 10 10\ncamera\n camera").unwrap_err();
        assert_eq!((err.position.line, err.position.column), (2, 1));
    }

    #[test]
    fn image_size_is_a_whole_number_of_pixels() {
        let err = parse("size 0.5 10").unwrap_err();
        assert_eq!((err.position.line, err.position.column), (0, 5));
        assert!(parse("size 10 -3").is_err());
        assert!(parse("size 10.5 10").is_err());
        assert!(parse("size 10").is_err());
    }

    #[test]
    fn rejects_unknown_directives_and_bad_values() {
        assert!(parse("size 10 10\ncone (0, 0, 0) 1").is_err());
        assert!(parse("size 10 10\nsphere (0, 0, 0) -1").is_err());
        assert!(parse("size 0 10").is_err());
        assert!(parse("size 10 10\nplane (0, 0, 0) 1").is_err());
        assert!(parse("size 10 10\ncamera from (1, 1, 1) to (1, 1, 1)").is_err());
        assert!(parse("size 10 10\ncamera\ncamera").is_err());
        assert!(parse("size 10 10\nmodel missing.obj").is_err());
    }

    #[test]
    fn missing_model_file_is_a_parse_error() {
        let err = parse("size 10 10\nmodel \"no/such/file.obj\" > scale 2").unwrap_err();
        assert!(err.message.contains("no/such/file.obj"));
        assert_eq!((err.position.line, err.position.column), (1, 6));
    }
}
