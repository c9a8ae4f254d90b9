//! Embedded single-page chat client.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Duo Chat</title>
    <style>
        body {
            margin: 0;
            font-family: system-ui, sans-serif;
            background: #f4f5f7;
        }
        #login, #chat { max-width: 720px; margin: 40px auto; padding: 0 16px; }
        #chat { display: none; }
        .status { color: #888; font-size: 14px; margin-bottom: 10px; }
        #messages {
            height: calc(100vh - 220px);
            overflow-y: auto;
            background: #fff;
            border-radius: 8px;
            padding: 12px;
        }
        .message { margin: 8px 0; padding: 8px 12px; border-radius: 8px; background: #eef; }
        .message.mine { background: #dfd; text-align: right; }
        .message .meta { font-size: 12px; color: #666; }
        .message .translation { font-size: 14px; color: #335; border-top: 1px solid #ccd; margin-top: 4px; padding-top: 4px; }
        .message img { max-width: 240px; border-radius: 4px; }
        .system { color: #a44; font-size: 13px; text-align: center; }
        form { display: flex; gap: 8px; margin-top: 10px; }
        input[type=text], input[type=password] { flex: 1; padding: 8px; }
    </style>
</head>
<body>
    <div id="login">
        <h1>Duo Chat</h1>
        <form id="login-form">
            <input type="password" id="password" placeholder="Password" autofocus />
            <button type="submit">Enter</button>
        </form>
        <div class="system" id="login-error"></div>
    </div>

    <div id="chat">
        <div class="status" id="status">Connecting...</div>
        <div id="messages"></div>
        <form id="send-form">
            <input type="text" id="text" placeholder="Type a message" autocomplete="off" />
            <input type="file" id="file" accept="image/*" />
            <button type="submit">Send</button>
        </form>
    </div>

    <script>
        const MAX_FILE_BYTES = 5 * 1024 * 1024;
        let ws;
        let me = null;

        const $ = (id) => document.getElementById(id);
        const send = (event, data) => ws.send(JSON.stringify(data === undefined ? { event } : { event, data }));

        function system(text) {
            const el = document.createElement('div');
            el.className = 'system';
            el.textContent = text;
            $('messages').appendChild(el);
        }

        function render(msg) {
            const el = document.createElement('div');
            el.className = 'message' + (msg.userIdentity === me ? ' mine' : '');

            const meta = document.createElement('div');
            meta.className = 'meta';
            meta.textContent = `${msg.userIdentity} · ${new Date(msg.timestamp).toLocaleTimeString()}`;
            el.appendChild(meta);

            if (msg.type === 'file') {
                const img = document.createElement('img');
                img.src = msg.fileData;
                img.alt = msg.fileName;
                el.appendChild(img);
            } else {
                const body = document.createElement('div');
                body.textContent = msg.text;
                el.appendChild(body);
                if (msg.translation) {
                    const tr = document.createElement('div');
                    tr.className = 'translation';
                    tr.textContent = `${msg.translation.translatedText} (${msg.translation.sourceLanguage} → ${msg.translation.targetLanguage})`;
                    el.appendChild(tr);
                }
            }

            $('messages').appendChild(el);
            $('messages').scrollTop = $('messages').scrollHeight;
        }

        function connect(password) {
            const protocol = window.location.protocol === 'https:' ? 'wss:' : 'ws:';
            ws = new WebSocket(`${protocol}//${window.location.host}/ws`);

            ws.onopen = () => send('authenticate', password);

            ws.onclose = () => {
                $('status').textContent = 'Disconnected';
                if (me) setTimeout(() => connect(password), 2000);
            };

            ws.onmessage = (event) => {
                let msg;
                try { msg = JSON.parse(event.data); } catch (e) { return; }
                switch (msg.event) {
                    case 'auth_success':
                        me = msg.data.userIdentity;
                        $('login').style.display = 'none';
                        $('chat').style.display = 'block';
                        break;
                    case 'auth_error':
                        me = null;
                        $('login-error').textContent = msg.data;
                        break;
                    case 'user_status':
                        $('status').textContent =
                            `You are ${me}. User1: ${msg.data.user1Connections}, User2: ${msg.data.user2Connections}`;
                        break;
                    case 'message_received':
                        render(msg.data);
                        break;
                    case 'error':
                        system(msg.data);
                        break;
                }
            };
        }

        $('login-form').addEventListener('submit', (e) => {
            e.preventDefault();
            $('login-error').textContent = '';
            connect($('password').value);
        });

        $('send-form').addEventListener('submit', (e) => {
            e.preventDefault();
            const text = $('text').value;
            if (text.trim()) {
                send('chat_message', { type: 'text', text });
                $('text').value = '';
            }

            const file = $('file').files[0];
            if (!file) return;
            $('file').value = '';
            if (!file.type.startsWith('image/')) return system('Only image files are supported');
            if (file.size > MAX_FILE_BYTES) return system('File too large. Maximum size is 5MB.');

            const reader = new FileReader();
            reader.onload = () => send('file_upload', {
                fileName: file.name,
                fileData: reader.result,
                fileType: file.type,
            });
            reader.readAsDataURL(file);
        });
    </script>
</body>
</html>
"#;
